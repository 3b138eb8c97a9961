//! Command handlers bridging CLI arguments to the core engine.

use std::fmt::Write as _;
use std::fs;
use std::io::Read as _;
use std::path::Path;

use anyhow::{Context, Result};
use cairn_core::history::HistoryStore;
use cairn_core::repo::selector;
use cairn_core::{cost, PlanRepository, PlanSummaries, PlanSummary, Tokens};

use crate::args::{HistoryArgs, ListArgs, NextArgs, RecordArgs, ShowArgs};
use crate::renderer::Renderer;

pub struct Cli {
    renderer: Renderer,
}

impl Cli {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn list(&self, args: &ListArgs) -> Result<()> {
        let plans = PlanRepository::new(&args.dir)
            .load_plans()
            .with_context(|| format!("Failed to scan plan directory '{}'", args.dir.display()))?;
        let summaries: Vec<PlanSummary> = plans.iter().map(PlanSummary::from).collect();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        } else {
            self.renderer.render(&PlanSummaries(summaries).to_string());
        }
        Ok(())
    }

    pub fn show(&self, args: &ShowArgs) -> Result<()> {
        let plan = repo_for(&args.plan)
            .load_plan(&args.plan)
            .with_context(|| format!("Failed to load plan '{}'", args.plan.display()))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            self.renderer.render(&plan.to_string());
        }
        Ok(())
    }

    pub fn next(&self, args: &NextArgs) -> Result<()> {
        let plans = PlanRepository::new(&args.dir)
            .load_plans()
            .with_context(|| format!("Failed to scan plan directory '{}'", args.dir.display()))?;
        if plans.is_empty() {
            self.renderer.render("No plans found.\n");
            return Ok(());
        }

        let mut out = String::new();
        for root in &plans {
            let selection = selector::select(root);
            let remaining = selector::remaining_plans(root);

            let _ = writeln!(out, "# {}", root.id);
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "- Next: **{}** ({})",
                selection.plan.id,
                selection.state.as_str()
            );
            let _ = writeln!(out, "- Remaining: {remaining} plan(s)");
            if args.files {
                let _ = writeln!(out, "- Files:");
                for file in selector::execution_files(root, selection.plan) {
                    let marker = if file.read_only { " (read-only)" } else { "" };
                    let _ = writeln!(out, "  - {}{marker}", file.path);
                }
            }
            let _ = writeln!(out);
        }
        self.renderer.render(&out);
        Ok(())
    }

    pub fn record(&self, args: &RecordArgs) -> Result<()> {
        let output = match &args.output_file {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read command output '{}'", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read command output from stdin")?;
                buf
            }
        };

        let data = cost::extract_cost_data(&output);
        let store = HistoryStore::for_plan(&args.plan);
        store
            .append(&data)
            .with_context(|| format!("Failed to update history '{}'", store.path().display()))?;

        self.renderer.render(&format!(
            "Recorded execution against **{}**: {} sent, {} received, ${:.4} message cost\n",
            args.plan.display(),
            Tokens(data.tokens_sent),
            Tokens(data.tokens_received),
            data.message_cost,
        ));
        Ok(())
    }

    pub fn history(&self, args: &HistoryArgs) -> Result<()> {
        let store = HistoryStore::for_plan(&args.plan);
        if store.entries().is_empty() {
            self.renderer.render("No executions recorded.\n");
            return Ok(());
        }

        // The history file is itself the human-readable render.
        let content = fs::read_to_string(store.path())
            .with_context(|| format!("Failed to read history '{}'", store.path().display()))?;
        self.renderer.render(&content);
        Ok(())
    }
}

/// A repository rooted at the directory containing the given plan file.
fn repo_for(plan: &Path) -> PlanRepository {
    let dir = plan
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    PlanRepository::new(dir)
}
