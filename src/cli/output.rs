//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::collections::BTreeMap;

use colored::Colorize;
use itertools::Itertools;
use termtree::Tree;

use crate::application::TreeSession;
use crate::domain::{Highlight, MemberDetail, MemberId, NodeKind, ToggleGlyph, Transform};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print labelled value (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One-line node label: glyph, name, nickname, badge.
pub fn member_label(session: &TreeSession, id: &MemberId, highlight: Highlight) -> String {
    let store = session.store();
    let Some(record) = store.get(id) else {
        return id.to_string();
    };

    let glyph = match session.tree().toggle_glyph(id) {
        ToggleGlyph::Expand => "[+] ",
        ToggleGlyph::Collapse => "[−] ",
        ToggleGlyph::None => "",
    };
    let nickname = record
        .nickname
        .as_deref()
        .map(|n| format!(" \"{n}\""))
        .unwrap_or_default();
    let kind = session.kind_of(id);
    let badge = match kind {
        NodeKind::Lord => format!(" {}", "♛ LORD".yellow().bold()),
        NodeKind::Veteran => format!(" {}", "veteran".cyan()),
        NodeKind::Regular => String::new(),
    };
    let stats = format!(" ({} yrs | {} wins)", record.tenure(), record.wins).dimmed();

    let name = match highlight {
        Highlight::Match => record.name.green().bold().to_string(),
        Highlight::Dimmed => record.name.dimmed().to_string(),
        Highlight::Neutral => record.name.clone(),
    };
    format!("{glyph}{name}{nickname}{badge}{stats}")
}

/// Visible hierarchy as a printable tree, lords under a single club root.
pub fn member_tree(
    session: &TreeSession,
    highlights: &BTreeMap<MemberId, Highlight>,
) -> Tree<String> {
    fn build(
        session: &TreeSession,
        id: &MemberId,
        highlights: &BTreeMap<MemberId, Highlight>,
    ) -> Tree<String> {
        let highlight = highlights.get(id).copied().unwrap_or(Highlight::Neutral);
        let mut node = Tree::new(member_label(session, id, highlight));
        let expanded = session
            .tree()
            .node(id)
            .is_some_and(|n| n.is_expanded());
        if expanded {
            for child in session.tree().children_ids(id) {
                node.push(build(session, child, highlights));
            }
        }
        node
    }

    let root = format!("club ({} members)", session.store().len());
    let mut tree = Tree::new(root);
    for lord in session.tree().lords() {
        tree.push(build(session, lord, highlights));
    }
    tree
}

/// Matched and dimmed counts for a classification.
pub fn highlight_summary(highlights: &BTreeMap<MemberId, Highlight>) -> String {
    let counts = highlights.values().counts();
    format!(
        "{} match, {} dimmed",
        counts.get(&Highlight::Match).copied().unwrap_or(0),
        counts.get(&Highlight::Dimmed).copied().unwrap_or(0)
    )
}

pub fn transform(t: &Transform) {
    action("translate", &format!("({:.2}, {:.2})", t.translate_x, t.translate_y));
    action("scale", &format!("{:.4}", t.scale));
}

/// Detail card; placeholders for missing optional fields live here.
pub fn member_detail(member: &MemberDetail<'_>) {
    let record = member.record;
    header(&record.name);
    if let Some(nickname) = &record.nickname {
        detail_line("nickname", &format!("\"{nickname}\""));
    }
    if let Some(hometown) = &record.hometown {
        detail_line("hometown", hometown);
    }
    if record.lord {
        detail(&"♛ LORD".yellow().bold());
    }
    detail_line("years", &member.tenure().to_string());
    detail_line("wins", &record.wins.to_string());
    if !record.years_attended.is_empty() {
        detail_line("attended", &member.years_sorted().iter().join(", "));
    }
    if let Some(sponsor) = member.sponsor_name {
        detail_line("sponsor", sponsor);
    }
    detail_line(
        "story",
        record.funny_story.as_deref().unwrap_or("No story yet..."),
    );
    if let Some(photo) = &record.photo_url {
        detail_line("photo", photo);
    }
}

fn detail_line(label: &str, value: &str) {
    println!("  {}: {}", label.green(), value);
}
