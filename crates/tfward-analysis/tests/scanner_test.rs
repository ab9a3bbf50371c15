//! Scanner tests: end-to-end scans, fault isolation, cancellation, config
//! filters, determinism.

use std::sync::Arc;

use tfward_analysis::adapters::aws::apigateway::Api;
use tfward_analysis::adapters::{default_adapters, Adapter, State};
use tfward_analysis::graph::{Block, ModuleGraph, RawBlock};
use tfward_analysis::rules::{BlockRule, Results, RuleDefinition, RuleDocumentation, RuleRegistry, StateRule};
use tfward_analysis::scanner::{DiagnosticKind, Scanner};
use tfward_core::{Provider, ScanConfig, Severity};

// ---- Helpers ----

fn test_definition(short_code: &'static str, severity: Severity) -> RuleDefinition {
    RuleDefinition {
        provider: Provider::General,
        service: "test",
        short_code,
        severity,
        required_types: &["resource"],
        required_labels: &["test_*"],
        documentation: RuleDocumentation::default(),
    }
}

fn panics_on_boom(block: &Block, _graph: &ModuleGraph) -> Results {
    if block.name_label() == "boom" {
        panic!("check exploded on {}", block.id());
    }
    let mut results = Results::default();
    results.add("seen", block);
    results
}

fn always_reports(block: &Block, _graph: &ModuleGraph) -> Results {
    let mut results = Results::default();
    results.add(format!("flagged {block}"), block);
    results
}

fn cite_every_api(state: &State) -> Results {
    let mut results = Results::default();
    for api in &state.aws.api_gateway.apis {
        results.add("api", api);
    }
    results
}

struct ExplodingAdapter;

impl Adapter for ExplodingAdapter {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn adapt(&self, _graph: &ModuleGraph, state: &mut State) {
        state.aws.api_gateway.apis.push(Api::unmanaged(9));
        panic!("adapter exploded halfway");
    }
}

fn registry(rules: Vec<Box<dyn FnOnce(&mut RuleRegistry)>>) -> Arc<RuleRegistry> {
    let mut registry = RuleRegistry::new();
    for add in rules {
        add(&mut registry);
    }
    Arc::new(registry)
}

fn block_rule(short_code: &'static str, severity: Severity, check: fn(&Block, &ModuleGraph) -> Results) -> Box<dyn FnOnce(&mut RuleRegistry)> {
    Box::new(move |r: &mut RuleRegistry| {
        r.register(BlockRule {
            definition: test_definition(short_code, severity),
            check,
        })
        .unwrap()
    })
}

fn state_rule(short_code: &'static str, severity: Severity, check: fn(&State) -> Results) -> Box<dyn FnOnce(&mut RuleRegistry)> {
    Box::new(move |r: &mut RuleRegistry| {
        r.register(StateRule {
            definition: test_definition(short_code, severity),
            check,
        })
        .unwrap()
    })
}

fn things(names: &[&str]) -> ModuleGraph {
    ModuleGraph::from_blocks(
        "main.tf",
        names
            .iter()
            .enumerate()
            .map(|(i, n)| RawBlock::resource("test_thing", n).at_lines(i as u32 * 10 + 1, i as u32 * 10 + 5))
            .collect(),
    )
}

fn scanner(config: ScanConfig, registry: Arc<RuleRegistry>) -> Scanner {
    Scanner::with_registry(config, registry).unwrap()
}

// ---- End to end ----

#[test]
fn builtin_scan_reports_firewall_and_monitoring_findings() {
    let graph = ModuleGraph::from_blocks(
        "main.tf",
        vec![
            RawBlock::resource("openstack_fw_rule_v1", "open").with_attr("action", "allow"),
            RawBlock::resource("google_container_cluster", "gke"),
            RawBlock::resource("aws_api_gateway_stage", "orphan")
                .with_attr("stage_name", "prod")
                .with_ref("rest_api_id", "aws_api_gateway_rest_api.missing.id"),
        ],
    );
    let report = Scanner::new(ScanConfig::default()).unwrap().scan(&graph);

    assert!(!report.partial);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.findings_for("openstack-fw-no-public-access").count(), 2);
    assert_eq!(report.findings_for("google-gke-enable-stackdriver-monitoring").count(), 1);
    // The orphaned stage is still on the security surface.
    assert_eq!(report.findings_for("aws-api-gateway-enable-access-logging").count(), 1);
    assert_eq!(report.findings_for("aws-api-gateway-enable-tracing").count(), 1);
    assert_eq!(report.stats.findings, report.findings.len());
    assert_eq!(report.stats.adapters_run, 2);
}

// ---- Isolation ----

#[test]
fn panicking_rule_does_not_stop_the_scan() {
    let reg = registry(vec![
        block_rule("panicky", Severity::High, panics_on_boom),
        block_rule("steady", Severity::High, always_reports),
    ]);
    let graph = things(&["a", "boom", "c"]);
    let report = scanner(ScanConfig::default(), reg).scan(&graph);

    assert_eq!(report.findings_for("general-test-panicky").count(), 2);
    assert_eq!(report.findings_for("general-test-steady").count(), 3);
    assert!(!report.partial);

    let panics: Vec<_> = report.diagnostics_of(DiagnosticKind::RulePanicked).collect();
    assert_eq!(panics.len(), 1);
    assert_eq!(panics[0].rule_id.as_deref(), Some("general-test-panicky"));
    assert_eq!(panics[0].target, "test_thing.boom");
    assert!(panics[0].message.contains("check exploded on test_thing.boom"));
    assert_eq!(panics[0].location.as_ref().map(|r| r.start_line), Some(11));
}

#[test]
fn panicking_adapter_output_is_discarded() {
    let reg = registry(vec![state_rule("apis", Severity::Low, cite_every_api)]);
    let mut adapters: Vec<Box<dyn Adapter>> = vec![Box::new(ExplodingAdapter)];
    adapters.extend(default_adapters());

    let graph = ModuleGraph::from_blocks("main.tf", vec![RawBlock::resource("aws_api_gateway_rest_api", "a")]);
    let report = scanner(ScanConfig::default(), reg).with_adapters(adapters).scan(&graph);

    let adapter_panics: Vec<_> = report.diagnostics_of(DiagnosticKind::AdapterPanicked).collect();
    assert_eq!(adapter_panics.len(), 1);
    assert_eq!(adapter_panics[0].target, "exploding");
    // Only the REST API from the healthy adapter reaches the rule.
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].reference, "aws_api_gateway_rest_api.a");
    assert_eq!(report.stats.adapters_run, 2);
}

// ---- Cancellation ----

#[test]
fn cancelled_scan_returns_partial_report() {
    let reg = registry(vec![block_rule("steady", Severity::High, always_reports)]);
    let s = scanner(ScanConfig::default(), reg);
    let graph = things(&["a", "b"]);

    s.cancellation().cancel();
    let report = s.scan(&graph);
    assert!(report.partial);
    assert!(report.findings.is_empty());
    assert_eq!(report.stats.skipped, 2);
    let cancelled: Vec<_> = report.diagnostics_of(DiagnosticKind::Cancelled).collect();
    assert_eq!(cancelled.len(), 1);
    assert!(cancelled[0].message.starts_with("scan cancelled"));

    s.cancellation().reset();
    let report = s.scan(&graph);
    assert!(!report.partial);
    assert_eq!(report.findings.len(), 2);
}

#[test]
fn expired_deadline_skips_outstanding_work() {
    let reg = registry(vec![block_rule("steady", Severity::High, always_reports)]);
    let config = ScanConfig {
        timeout_ms: Some(0),
        ..Default::default()
    };
    let report = scanner(config, reg).scan(&things(&["a", "b", "c"]));
    assert!(report.partial);
    assert_eq!(report.stats.skipped, 3);
    let cancelled: Vec<_> = report.diagnostics_of(DiagnosticKind::Cancelled).collect();
    assert!(cancelled[0].message.starts_with("scan deadline exceeded"));
}

#[test]
fn cancellation_handle_works_across_threads() {
    let reg = registry(vec![block_rule("steady", Severity::High, always_reports)]);
    let s = scanner(ScanConfig::default(), reg);
    let handle = s.cancellation().clone();
    std::thread::spawn(move || handle.cancel()).join().unwrap();
    assert!(s.scan(&things(&["a"])).partial);
}

// ---- Config filters ----

#[test]
fn excluded_rules_do_not_run() {
    let reg = registry(vec![
        block_rule("one", Severity::High, always_reports),
        block_rule("two", Severity::High, always_reports),
    ]);
    let config = ScanConfig {
        exclude_rules: vec!["general-test-one".to_string()],
        ..Default::default()
    };
    let report = scanner(config, reg).scan(&things(&["a"]));
    assert_eq!(report.stats.rules_executed, 1);
    assert_eq!(report.findings_for("general-test-one").count(), 0);
    assert_eq!(report.findings_for("general-test-two").count(), 1);
}

#[test]
fn minimum_severity_drops_lower_findings() {
    let reg = registry(vec![
        block_rule("low", Severity::Low, always_reports),
        block_rule("critical", Severity::Critical, always_reports),
    ]);
    let config = ScanConfig {
        minimum_severity: Some("high".to_string()),
        ..Default::default()
    };
    let report = scanner(config, reg).scan(&things(&["a", "b"]));
    assert!(report.findings.iter().all(|f| f.severity == Severity::Critical));
    assert_eq!(report.findings.len(), 2);
    assert_eq!(report.stats.filtered, 2);
}

#[test]
fn unmanaged_findings_can_be_excluded() {
    let reg = || registry(vec![state_rule("apis", Severity::Low, cite_every_api)]);
    let graph = ModuleGraph::from_blocks(
        "main.tf",
        vec![
            RawBlock::resource("aws_api_gateway_rest_api", "a"),
            RawBlock::resource("aws_api_gateway_stage", "lost").with_ref("rest_api_id", "aws_api_gateway_rest_api.gone.id"),
        ],
    );

    let default_report = scanner(ScanConfig::default(), reg()).scan(&graph);
    assert_eq!(default_report.findings.len(), 2);

    let config = ScanConfig {
        include_unmanaged: Some(false),
        ..Default::default()
    };
    let report = scanner(config, reg()).scan(&graph);
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].managed);
}

// ---- Determinism and ordering ----

#[test]
fn findings_follow_rule_then_block_order() {
    let reg = registry(vec![
        block_rule("first", Severity::High, always_reports),
        block_rule("second", Severity::High, always_reports),
    ]);
    let report = scanner(ScanConfig::default(), reg).scan(&things(&["x", "y"]));
    let order: Vec<_> = report
        .findings
        .iter()
        .map(|f| format!("{}@{}", f.short_code, f.reference))
        .collect();
    assert_eq!(
        order,
        vec![
            "first@test_thing.x",
            "first@test_thing.y",
            "second@test_thing.x",
            "second@test_thing.y"
        ]
    );
}

#[test]
fn thread_count_does_not_change_the_report() {
    let names: Vec<String> = (0..64).map(|i| format!("n{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let graph = things(&refs);
    let make = || {
        registry(vec![
            block_rule("first", Severity::High, always_reports),
            block_rule("second", Severity::Medium, always_reports),
        ])
    };

    let single = scanner(ScanConfig { threads: Some(1), ..Default::default() }, make()).scan(&graph);
    let multi = scanner(ScanConfig { threads: Some(4), ..Default::default() }, make()).scan(&graph);
    let auto = scanner(ScanConfig::default(), make()).scan(&graph);
    assert_eq!(single.findings, multi.findings);
    assert_eq!(single.findings, auto.findings);
    assert_eq!(single.findings.len(), 128);
}

#[test]
fn duplicate_blocks_surface_as_diagnostics() {
    let graph = ModuleGraph::from_blocks(
        "main.tf",
        vec![
            RawBlock::resource("test_thing", "dup").at_lines(1, 2),
            RawBlock::resource("test_thing", "dup").at_lines(4, 5),
        ],
    );
    let reg = registry(vec![block_rule("steady", Severity::High, always_reports)]);
    let report = scanner(ScanConfig::default(), reg).scan(&graph);
    assert_eq!(report.findings.len(), 1);
    let dups: Vec<_> = report.diagnostics_of(DiagnosticKind::DuplicateBlock).collect();
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].target, "test_thing.dup");
}

#[test]
fn report_serializes_to_json() {
    let reg = registry(vec![block_rule("steady", Severity::High, always_reports)]);
    let report = scanner(ScanConfig::default(), reg).scan(&things(&["a"]));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["findings"][0]["rule_id"], "general-test-steady");
    assert_eq!(json["findings"][0]["severity"], "high");
    assert_eq!(json["partial"], false);
}
