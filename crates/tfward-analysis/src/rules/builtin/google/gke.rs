//! `google-gke-enable-stackdriver-monitoring`

use tfward_core::{Provider, Severity};

use crate::graph::{Block, ModuleGraph};
use crate::rules::results::Results;
use crate::rules::types::{BlockRule, RuleDefinition, RuleDocumentation};

const KUBERNETES_MONITORING: &str = "monitoring.googleapis.com/kubernetes";

const BAD_EXAMPLE: &str = r#"
resource "google_container_cluster" "bad_example" {
  name               = "my-gke-cluster"
  location           = "us-central1"
  initial_node_count = 1
  monitoring_service = "monitoring.googleapis.com"
}
"#;

const GOOD_EXAMPLE: &str = r#"
resource "google_container_cluster" "good_example" {
  name               = "my-gke-cluster"
  location           = "us-central1"
  initial_node_count = 1
  monitoring_service = "monitoring.googleapis.com/kubernetes"
}
"#;

pub fn enable_stackdriver_monitoring() -> BlockRule {
    BlockRule {
        definition: RuleDefinition {
            provider: Provider::Google,
            service: "gke",
            short_code: "enable-stackdriver-monitoring",
            severity: Severity::Low,
            required_types: &["resource"],
            required_labels: &["google_container_cluster"],
            documentation: RuleDocumentation {
                summary: "Stackdriver Monitoring should be enabled",
                explanation: "StackDriver monitoring aggregates logs, events, and metrics from your \
                    Kubernetes environment on GKE to help you understand your application's behavior in production.",
                impact: "Visibility will be reduced",
                resolution: "Enable StackDriver monitoring",
                bad_examples: &[BAD_EXAMPLE],
                good_examples: &[GOOD_EXAMPLE],
                links: &["https://registry.terraform.io/providers/hashicorp/google/latest/docs/resources/container_cluster#monitoring_service"],
            },
        },
        check: check_stackdriver_monitoring,
    }
}

fn check_stackdriver_monitoring(block: &Block, _graph: &ModuleGraph) -> Results {
    let mut results = Results::default();
    let message = format!("Resource does not have monitoring_service set to {KUBERNETES_MONITORING}");

    let monitoring = block.get_attribute("monitoring_service");
    if monitoring.is_nil() {
        results.add(message, block);
    } else if monitoring.not_equal(KUBERNETES_MONITORING) {
        results.add(message, &monitoring);
    }
    results
}
