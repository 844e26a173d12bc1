//! Plan rendering.
//!
//! Turns a [`Plan`] into the preview users see: an indented tree with one
//! state tag per line, directories before files within each level, and a
//! summary footer.  A JSON variant serialises the whole plan for scripts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde::Serialize;

use planter_core::domain::{NodeKind, PathState, Plan, PlanSummary};

const INDENT: &str = "    ";

/// Render the plan as an indented tree plus summary footer.
///
/// `colored` picks ANSI tags; pass false for the plain `[new]`-style tags.
pub fn render_plan(plan: &Plan, colored: bool) -> String {
    let mut top = Level::default();
    for (path, kind) in plan_entries(plan) {
        let Ok(relative) = path.strip_prefix(plan.root()) else {
            continue;
        };
        let components: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if components.is_empty() {
            continue;
        }
        top.insert(&components, kind);
    }

    let mut out = format!("{}/\n", plan.root().display());
    render_level(&top, plan.root(), plan, colored, 1, &mut out);
    out.push('\n');
    out.push_str(&summary_line(&plan.summary()));
    out.push('\n');
    out
}

/// One line of counts for the footer.
pub fn summary_line(summary: &PlanSummary) -> String {
    format!(
        "Plan: {} new, {} existing, {} to overwrite, {} conflicting, {} warning(s)",
        summary.new, summary.exists, summary.overwrite, summary.conflicts, summary.warnings
    )
}

/// Serialise the plan (plus its summary) as pretty JSON.
pub fn render_json(plan: &Plan) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct PlanDocument<'a> {
        #[serde(flatten)]
        plan: &'a Plan,
        summary: PlanSummary,
    }

    serde_json::to_string_pretty(&PlanDocument {
        plan,
        summary: plan.summary(),
    })
}

// ---- Internal Helpers ----

fn plan_entries(plan: &Plan) -> impl Iterator<Item = (&PathBuf, NodeKind)> {
    plan.planned_dirs()
        .iter()
        .map(|p| (p, NodeKind::Directory))
        .chain(plan.planned_files().iter().map(|p| (p, NodeKind::File)))
}

/// Planned entries regrouped by directory level for rendering.
#[derive(Default)]
struct Level {
    dirs: HashMap<String, Level>,
    files: Vec<String>,
}

impl Level {
    fn insert(&mut self, components: &[String], kind: NodeKind) {
        let Some((first, rest)) = components.split_first() else {
            return;
        };
        if rest.is_empty() {
            match kind {
                NodeKind::Directory => {
                    self.dirs.entry(first.clone()).or_default();
                }
                NodeKind::File => {
                    if !self.files.contains(first) {
                        self.files.push(first.clone());
                    }
                }
            }
        } else {
            self.dirs.entry(first.clone()).or_default().insert(rest, kind);
        }
    }
}

fn render_level(
    level: &Level,
    base: &Path,
    plan: &Plan,
    colored: bool,
    depth: usize,
    out: &mut String,
) {
    let indent = INDENT.repeat(depth);

    let mut dir_names: Vec<&String> = level.dirs.keys().collect();
    dir_names.sort_by_key(|name| name.to_lowercase());
    for name in dir_names {
        let path = base.join(name);
        out.push_str(&indent);
        out.push_str(name);
        out.push('/');
        if let Some(state) = plan.state_of(&path) {
            out.push(' ');
            out.push_str(&state_tag(state, colored));
        }
        out.push('\n');
        if let Some(child) = level.dirs.get(name) {
            render_level(child, &path, plan, colored, depth + 1, out);
        }
    }

    let mut file_names = level.files.clone();
    file_names.sort_by_key(|name| name.to_lowercase());
    for name in &file_names {
        let path = base.join(name);
        out.push_str(&indent);
        out.push_str(name);
        if let Some(state) = plan.state_of(&path) {
            out.push(' ');
            out.push_str(&state_tag(state, colored));
        }
        out.push('\n');
    }
}

fn state_tag(state: PathState, colored: bool) -> String {
    let label = format!("[{}]", state.label());
    if !colored {
        return label;
    }
    match state {
        PathState::New => label.green().to_string(),
        PathState::Exists => label.dimmed().to_string(),
        PathState::Overwrite => label.blue().to_string(),
        PathState::Conflict => label.red().bold().to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
