//! `openstack-fw-no-public-access`

use tfward_core::{Provider, Severity};

use crate::graph::{Block, ModuleGraph};
use crate::rules::cidr;
use crate::rules::results::Results;
use crate::rules::types::{BlockRule, RuleDefinition, RuleDocumentation};

const BAD_EXAMPLE: &str = r#"
resource "openstack_fw_rule_v1" "rule_1" {
  name             = "my_rule"
  description      = "let anyone in"
  action           = "allow"
  protocol         = "tcp"
  destination_port = "22"
  enabled          = "true"
}
"#;

const GOOD_EXAMPLE: &str = r#"
resource "openstack_fw_rule_v1" "rule_1" {
  name                   = "my_rule"
  description            = "don't let just anyone in"
  action                 = "allow"
  protocol               = "tcp"
  destination_ip_address = "10.10.10.1"
  source_ip_address      = "10.10.10.2"
  destination_port       = "22"
  enabled                = "true"
}
"#;

pub fn no_public_access() -> BlockRule {
    BlockRule {
        definition: RuleDefinition {
            provider: Provider::OpenStack,
            service: "fw",
            short_code: "no-public-access",
            severity: Severity::Medium,
            required_types: &["resource"],
            required_labels: &["openstack_fw_rule_v1"],
            documentation: RuleDocumentation {
                summary: "A firewall rule allows traffic from/to the public internet",
                explanation: "Opening up ports to the public internet is generally to be avoided. \
                    You should restrict access to IP addresses or ranges that explicitly require it where possible.",
                impact: "Exposure of infrastructure to the public internet",
                resolution: "Employ more restrictive firewall rules",
                bad_examples: &[BAD_EXAMPLE],
                good_examples: &[GOOD_EXAMPLE],
                links: &["https://registry.terraform.io/providers/terraform-provider-openstack/openstack/latest/docs/resources/fw_rule_v1"],
            },
        },
        check: check_no_public_access,
    }
}

fn check_no_public_access(block: &Block, _graph: &ModuleGraph) -> Results {
    let mut results = Results::default();

    // Disabled rules and deny rules never open anything.
    if block.get_attribute("enabled").is_false() || block.get_attribute("action").equals("deny") {
        return results;
    }

    for (attr_name, direction) in [("destination_ip_address", "destination"), ("source_ip_address", "source")] {
        let ip = block.get_attribute(attr_name);
        if ip.is_nil() || ip.equals("") {
            results.add(
                format!("Resource '{block}' defines a firewall rule with no restriction on {direction} IP"),
                block,
            );
        } else if cidr::is_open(&ip) {
            results.add(
                format!("Resource '{block}' defines a firewall rule with a public {direction} CIDR"),
                &ip,
            );
        }
    }

    results
}
