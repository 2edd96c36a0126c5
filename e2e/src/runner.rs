//! Test runner - executes cases endpoint by endpoint and reports per-endpoint totals

use colored::Colorize;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use crate::types::{SharedUpstreamState, TestResult};

pub type TestFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A single test case; `name` is `<group>/<case>`, e.g. `ask/answer`
pub struct TestCase {
    pub name: &'static str,
    pub description: &'static str,
    pub run: Box<dyn Fn(TestContext) -> TestFuture + Send + Sync>,
}

impl TestCase {
    /// Endpoint group the case belongs to (the part before the first `/`)
    pub fn group(&self) -> &'static str {
        group_of(self.name)
    }
}

fn group_of(name: &str) -> &str {
    name.split_once('/').map_or(name, |(group, _)| group)
}

/// Context passed to each test - where the relay listens and what upstream saw
#[derive(Clone)]
pub struct TestContext {
    pub relay_addr: String,
    pub upstream_state: SharedUpstreamState,
    pub http_client: reqwest::Client,
}

impl TestContext {
    /// Forget queued responses and recorded requests from the previous case
    fn reset_upstream(&self) {
        let mut state = self.upstream_state.lock().unwrap();
        state.response_queue.clear();
        state.received_requests.clear();
    }
}

/// Pass/fail totals for one endpoint group
#[derive(Debug, Default, Clone, Copy)]
struct GroupTally {
    passed: usize,
    failed: usize,
    duration_ms: u64,
}

/// Run the selected cases sequentially, grouped by endpoint, and print a summary
pub async fn run_tests(cases: Vec<TestCase>, ctx: TestContext, filter: Option<&str>) -> Vec<TestResult> {
    let selected: Vec<&TestCase> = cases
        .iter()
        .filter(|c| filter.map_or(true, |f| c.name.contains(f)))
        .collect();

    println!("\n{}", "═══ prompt-relay end-to-end ═══".bright_white().bold());
    println!("  Relay:    {}", ctx.relay_addr.bright_cyan());
    println!("  Selected: {} case(s)", selected.len().to_string().bright_cyan());

    let mut results = Vec::with_capacity(selected.len());
    let mut current_group = "";

    for case in selected {
        if case.group() != current_group {
            current_group = case.group();
            println!("\n  {}", format!("/{current_group}").bright_blue().bold());
        }

        ctx.reset_upstream();
        results.push(run_case(case, ctx.clone()).await);
    }

    print_summary(&results);
    results
}

async fn run_case(case: &TestCase, ctx: TestContext) -> TestResult {
    let short_name = case.name.split_once('/').map_or(case.name, |(_, rest)| rest);
    print!("    {:32} ", short_name);

    let start = Instant::now();
    let outcome = (case.run)(ctx).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            println!("{} {}", "ok".bright_green(), format!("{duration_ms}ms").dimmed());
            TestResult {
                name: case.name.to_string(),
                passed: true,
                error: None,
                duration_ms,
            }
        }
        Err(e) => {
            println!("{} {}", "FAILED".bright_red().bold(), format!("{duration_ms}ms").dimmed());
            println!("      {}", case.description.dimmed());
            for cause in e.chain() {
                println!("      {} {}", "└─".bright_red(), cause);
            }
            TestResult {
                name: case.name.to_string(),
                passed: false,
                error: Some(e.to_string()),
                duration_ms,
            }
        }
    }
}

fn tally(results: &[TestResult]) -> BTreeMap<&str, GroupTally> {
    let mut groups: BTreeMap<&str, GroupTally> = BTreeMap::new();
    for result in results {
        let entry = groups.entry(group_of(&result.name)).or_default();
        if result.passed {
            entry.passed += 1;
        } else {
            entry.failed += 1;
        }
        entry.duration_ms += result.duration_ms;
    }
    groups
}

fn print_summary(results: &[TestResult]) {
    let groups = tally(results);

    println!("\n  {}", "Summary".bright_white().bold());
    for (group, t) in &groups {
        let line = format!(
            "    /{:10} {:>3} passed {:>3} failed {:>6}ms",
            group, t.passed, t.failed, t.duration_ms
        );
        if t.failed == 0 {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }

    let failed: Vec<&TestResult> = results.iter().filter(|r| !r.passed).collect();
    let total = format!("  {} of {} case(s) passed", results.len() - failed.len(), results.len());
    if failed.is_empty() {
        println!("\n{}\n", total.bright_green().bold());
    } else {
        println!("\n{}", total.bright_red().bold());
        for r in failed {
            println!("    {} {}", "✗".bright_red(), r.name);
        }
        println!();
    }
}

/// List the registered cases, grouped by endpoint
pub fn list_tests(cases: &[TestCase]) {
    let mut current_group = "";
    for case in cases {
        if case.group() != current_group {
            current_group = case.group();
            println!("\n{}", format!("/{current_group}").bright_white().bold());
        }
        println!("  {:40} {}", case.name.bright_cyan(), case.description);
    }
    println!();
}
