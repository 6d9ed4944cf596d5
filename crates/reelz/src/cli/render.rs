//! # Rendering
//!
//! Every renderer takes plain data from `reelzapp` and returns a `String`; the
//! handlers in `commands.rs` decide when to print. Keeping rendering free of
//! I/O lets the layout be tested with canned records.
//!
//! ## Video Rows
//!
//! A feed row is laid out in fixed columns so the list scans vertically:
//!
//! ```text
//!   4:59  Hello world…                              @alice    1.2K views   3 days ago
//!         1718031234567
//! ```
//!
//! The title fills whatever width is left after the fixed columns and is cut
//! with `…` on a display-width (not byte) boundary.

use super::styles::PALETTE;
use chrono::{DateTime, NaiveDate, Utc};
use colored::Colorize;
use reelzapp::commands::profile::ProfilePage;
use reelzapp::commands::watch::VideoPage;
use reelzapp::commands::{CmdMessage, MessageLevel};
use reelzapp::model::{SessionUser, Video};
use std::fmt::Write;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const DURATION_WIDTH: usize = 6;
const HANDLE_WIDTH: usize = 14;
const VIEWS_WIDTH: usize = 12;
const TIME_WIDTH: usize = 14;

pub fn render_messages(messages: &[CmdMessage]) -> String {
    let mut out = String::new();
    for message in messages {
        let line = match message.level {
            MessageLevel::Info => message.content.dimmed(),
            MessageLevel::Success => message.content.green(),
            MessageLevel::Warning => message.content.yellow(),
            MessageLevel::Error => message.content.red(),
        };
        let _ = writeln!(out, "{}", line);
    }
    out
}

/// Compact view counts: `999`, `1.5K`, `2.3M`.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K", views as f64 / 1_000.0)
    } else {
        views.to_string()
    }
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

pub fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    Formatter::new().convert(duration.to_std().unwrap_or_default())
}

fn format_day_ago(date: NaiveDate) -> String {
    if date == Utc::now().date_naive() {
        return "today".to_string();
    }
    match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => format_time_ago(midnight.and_utc()),
        None => date.to_string(),
    }
}

fn video_row(video: &Video) -> String {
    let handle = truncate_to_width(&format!("@{}", video.user.nickname), HANDLE_WIDTH - 1);
    let views = format!("{} views", format_views(video.views));
    let ago = format_day_ago(video.upload_date);

    let fixed = 2 + DURATION_WIDTH + 2 + HANDLE_WIDTH + VIEWS_WIDTH + TIME_WIDTH;
    let title_width = LINE_WIDTH.saturating_sub(fixed);
    let title = pad_to_width(&truncate_to_width(&video.title, title_width), title_width);

    format!(
        "  {:>dw$}  {}{}{}{}\n  {}  {}\n",
        video.duration.to_string(),
        PALETTE.title.apply_to(title),
        PALETTE.handle.apply_to(pad_to_width(&handle, HANDLE_WIDTH)),
        PALETTE.count.apply_to(pad_to_width(&views, VIEWS_WIDTH)),
        PALETTE.muted.apply_to(format!("{:>tw$}", ago, tw = TIME_WIDTH)),
        " ".repeat(DURATION_WIDTH),
        PALETTE.id.apply_to(&video.id),
        dw = DURATION_WIDTH,
    )
}

pub fn render_video_list(videos: &[Video]) -> String {
    if videos.is_empty() {
        return "No videos yet.\n".to_string();
    }
    videos.iter().map(video_row).collect()
}

fn user_row(user: &SessionUser) -> String {
    let handle = format!("@{}", user.nickname);
    format!(
        "  {} {}  {}  {}\n",
        PALETTE.title.apply_to(&user.name),
        PALETTE.handle.apply_to(handle),
        PALETTE
            .count
            .apply_to(format!("{} followers", format_views(user.followers))),
        PALETTE.muted.apply_to(truncate_to_width(&user.bio, 40)),
    )
}

pub fn render_user_list(users: &[SessionUser]) -> String {
    users.iter().map(user_row).collect()
}

/// Search shows both result sets under headings; either may be empty.
pub fn render_search(videos: &[Video], users: &[SessionUser]) -> String {
    let mut out = String::new();
    if !users.is_empty() {
        let _ = writeln!(out, "{}", PALETTE.heading.apply_to(format!("Users ({})", users.len())));
        out.push_str(&render_user_list(users));
    }
    if !videos.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", PALETTE.heading.apply_to(format!("Videos ({})", videos.len())));
        out.push_str(&render_video_list(videos));
    }
    out
}

pub fn render_account(user: &SessionUser) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        PALETTE.title.apply_to(&user.name),
        PALETTE.handle.apply_to(format!("@{}", user.nickname))
    );
    let _ = writeln!(out, "  email:    {}", user.email);
    if !user.bio.is_empty() {
        let _ = writeln!(out, "  bio:      {}", user.bio);
    }
    let _ = writeln!(out, "  avatar:   {}", PALETTE.muted.apply_to(&user.avatar));
    let _ = writeln!(
        out,
        "  joined:   {}",
        PALETTE.muted.apply_to(format_time_ago(user.join_date))
    );
    out
}

fn stats_line(user: &SessionUser, video_count: usize) -> String {
    format!(
        "{} followers · {} following · {} views · {} videos",
        PALETTE.count.apply_to(format_views(user.followers)),
        PALETTE.count.apply_to(format_views(user.following)),
        PALETTE.count.apply_to(format_views(user.total_views)),
        PALETTE.count.apply_to(video_count),
    )
}

pub fn render_profile(page: &ProfilePage) -> String {
    let user = &page.user;
    let mut out = String::new();
    let relation = if page.is_own {
        " (you)"
    } else if page.is_following {
        " (following)"
    } else {
        ""
    };
    let _ = writeln!(
        out,
        "{} {}{}",
        PALETTE.title.apply_to(&user.name),
        PALETTE.handle.apply_to(format!("@{}", user.nickname)),
        PALETTE.muted.apply_to(relation)
    );
    if !user.bio.is_empty() {
        let _ = writeln!(out, "{}", user.bio);
    }
    let _ = writeln!(out, "{}", stats_line(user, page.videos.len()));
    let _ = writeln!(
        out,
        "{}",
        PALETTE
            .muted
            .apply_to(format!("Joined {}", user.join_date.format("%B %Y")))
    );
    out.push('\n');
    if page.videos.is_empty() {
        out.push_str("No videos yet.\n");
    } else {
        out.push_str(&render_video_list(&page.videos));
    }
    out
}

pub fn render_video_page(page: &VideoPage) -> String {
    let video = &page.video;
    let mut out = String::new();
    let _ = writeln!(out, "{}", PALETTE.title.apply_to(&video.title));
    let _ = writeln!(
        out,
        "{} views · {} · {} · {}",
        PALETTE.count.apply_to(format_views(video.views)),
        video.duration,
        video.upload_date.format("%Y-%m-%d"),
        PALETTE.id.apply_to(&video.id)
    );
    let _ = writeln!(
        out,
        "{} {} · {} followers{}",
        video.user.name,
        PALETTE.handle.apply_to(format!("@{}", video.user.nickname)),
        format_views(page.owner_followers),
        if page.following_owner { " · following" } else { "" }
    );
    let liked = if page.liked { " (you liked this)" } else { "" };
    let _ = writeln!(
        out,
        "{} likes{}",
        PALETTE.count.apply_to(format_views(video.likes)),
        liked
    );
    if let Some(url) = &video.video_url {
        let _ = writeln!(out, "{}", PALETTE.muted.apply_to(url));
    }
    out.push('\n');
    let _ = writeln!(out, "{}", video.description);

    out.push('\n');
    let _ = writeln!(
        out,
        "{}",
        PALETTE
            .heading
            .apply_to(format!("Comments ({})", page.comments.len()))
    );
    if page.comments.is_empty() {
        out.push_str("  No comments yet.\n");
    }
    for comment in &page.comments {
        let _ = writeln!(
            out,
            "  {} {}",
            PALETTE.handle.apply_to(format!("@{}", comment.user.nickname)),
            PALETTE.muted.apply_to(format_time_ago(comment.date))
        );
        for line in comment.content.lines() {
            let _ = writeln!(out, "    {}", line);
        }
    }

    if !page.related.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", PALETTE.heading.apply_to("More videos"));
        out.push_str(&render_video_list(&page.related));
    }
    out
}

/// One line of simulated upload progress, redrawn in place.
pub fn render_progress(percent: u8) -> String {
    const BAR: usize = 30;
    let filled = BAR * usize::from(percent.min(100)) / 100;
    format!(
        "\rUploading [{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR - filled),
        percent
    )
}
