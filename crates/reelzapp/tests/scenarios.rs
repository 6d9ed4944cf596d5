use reelzapp::api::ReelzApi;
use reelzapp::commands::profile::{ProfileUpdate, ProfileView};
use reelzapp::commands::register::Registration;
use reelzapp::commands::upload::UploadRequest;
use reelzapp::commands::watch::{VideoView, ViewTracker};
use reelzapp::error::{MediaError, ReelzError, ValidationError};
use reelzapp::media::MediaAsset;
use reelzapp::session::Session;
use reelzapp::store::backend::StorageBackend;
use reelzapp::store::keys;
use reelzapp::store::local_store::LocalStore;
use reelzapp::store::mem_backend::MemBackend;
use reelzapp::store::memory::InMemoryStore;

fn setup() -> ReelzApi<InMemoryStore> {
    ReelzApi::new(InMemoryStore::new())
}

fn register(api: &mut ReelzApi<InMemoryStore>, nickname: &str) -> Session {
    let mut session = Session::anonymous();
    api.register(
        Registration {
            name: format!("{} Example", nickname),
            nickname: nickname.to_string(),
            email: format!("{}@example.com", nickname),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        },
        &mut session,
    )
    .unwrap();
    session
}

fn upload(api: &mut ReelzApi<InMemoryStore>, session: &Session, title: &str, secs: f64) -> String {
    let result = api
        .upload(
            session,
            UploadRequest {
                title: title.to_string(),
                description: format!("{} description", title),
                media: Some(MediaAsset::new("video/mp4", 1_000_000, secs)),
                thumbnail: None,
            },
        )
        .unwrap();
    result.affected_videos[0].id.clone()
}

#[test]
fn alice_uploads_bob_likes_and_comments() {
    let mut api = setup();
    let alice = register(&mut api, "alice");
    let id = upload(&mut api, &alice, "Hello", 299.0);

    let mut bob = Session::anonymous();
    register(&mut api, "bob");
    api.login("bob@example.com", "secret1", &mut bob).unwrap();

    api.toggle_like(&bob, &id).unwrap();
    let video = api.find_video(&id).unwrap().unwrap();
    assert_eq!(video.likes, 1);
    assert_eq!(video.comments, 0);
    assert_eq!(video.duration.to_string(), "4:59");

    api.add_comment(&bob, &id, "Nice!").unwrap();
    let mut visit = ViewTracker::new();
    let VideoView::Found(page) = api.watch_video(&id, &bob, &mut visit).unwrap() else {
        panic!("video should exist");
    };
    assert_eq!(page.video.comments, 1);
    assert_eq!(page.comments[0].content, "Nice!");
    assert_eq!(page.comments[0].user.nickname, "bob");
    assert!(page.liked);
}

#[test]
fn duplicate_registrations_are_rejected() {
    let mut api = setup();
    register(&mut api, "alice");

    let mut session = Session::anonymous();
    let err = api
        .register(
            Registration {
                name: "Impostor".into(),
                nickname: "ALICE".into(),
                email: "someone@example.com".into(),
                password: "secret1".into(),
                confirm_password: "secret1".into(),
            },
            &mut session,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ReelzError::Validation(ValidationError::DuplicateNickname)
    ));
}

#[test]
fn duration_over_five_minutes_is_rejected_without_writes() {
    let mut api = setup();
    let alice = register(&mut api, "alice");

    let err = api
        .upload(
            &alice,
            UploadRequest {
                title: "Long".into(),
                description: "Too long".into(),
                media: Some(MediaAsset::new("video/mp4", 10, 301.0)),
                thumbnail: None,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ReelzError::Validation(ValidationError::Media(MediaError::TooLong { .. }))
    ));
    assert!(api.feed(None).unwrap().listed_videos.is_empty());
}

#[test]
fn views_are_idempotent_within_a_visit() {
    let mut api = setup();
    let alice = register(&mut api, "alice");
    let id = upload(&mut api, &alice, "Hello", 30.0);

    let mut visit = ViewTracker::new();
    for _ in 0..3 {
        api.watch_video(&id, &alice, &mut visit).unwrap();
    }
    assert_eq!(api.find_video(&id).unwrap().unwrap().views, 1);
}

#[test]
fn profile_edit_propagates_to_video_snapshots() {
    let mut api = setup();
    let mut alice = register(&mut api, "alice");
    let id = upload(&mut api, &alice, "Hello", 30.0);

    let mut patch = ProfileUpdate::from_current(alice.user().unwrap());
    patch.nickname = "alicia".into();
    patch.name = "Alicia".into();
    api.update_profile(&mut alice, patch).unwrap();

    let video = api.find_video(&id).unwrap().unwrap();
    assert_eq!(video.user.nickname, "alicia");
    assert_eq!(video.user.name, "Alicia");
    assert!(matches!(
        api.view_profile("alice", &alice).unwrap(),
        ProfileView::NotFound { .. }
    ));
    let ProfileView::Found(page) = api.view_profile("alicia", &alice).unwrap() else {
        panic!("renamed profile should exist");
    };
    assert!(page.is_own);
    assert_eq!(page.videos.len(), 1);
}

#[test]
fn unknown_profile_is_not_found_state() {
    let mut api = setup();
    register(&mut api, "alice");
    assert_eq!(
        api.view_profile("nobody", &Session::anonymous()).unwrap(),
        ProfileView::NotFound {
            nickname: "nobody".into()
        }
    );
}

#[test]
fn malformed_collections_read_as_empty() {
    let backend = MemBackend::new();
    backend.put_raw(keys::ALL_VIDEOS, "definitely not json");
    backend.put_raw(keys::REGISTERED_USERS, "{\"not\":\"an array\"}");
    let mut api = ReelzApi::new(LocalStore::with_backend(backend));

    assert!(api.feed(None).unwrap().listed_videos.is_empty());
    let mut session = Session::anonymous();
    assert!(matches!(
        api.login("a@b.co", "secret1", &mut session),
        Err(ReelzError::NoUsersRegistered)
    ));
}

#[test]
fn failed_counter_write_is_repaired_by_doctor() {
    let backend = MemBackend::new();
    let mut api: ReelzApi<InMemoryStore> = ReelzApi::new(LocalStore::with_backend(backend.clone()));
    let alice = register(&mut api, "alice");
    let id = upload(&mut api, &alice, "Hello", 1.0);

    backend.fail_writes_to(Some(keys::ALL_VIDEOS));
    assert!(api.toggle_like(&alice, &id).is_err());
    backend.fail_writes_to(None);

    assert_eq!(api.find_video(&id).unwrap().unwrap().likes, 0);
    let report = api.doctor_report(true).unwrap();
    assert!(report.fixed);
    assert_eq!(api.find_video(&id).unwrap().unwrap().likes, 1);
    assert!(backend.get_item(keys::USER_LIKES).unwrap().is_some());
}
