//! API Gateway checks over adapted state.

use tfward_core::{Provider, Severity};

use crate::adapters::aws::apigateway::{Api, Stage};
use crate::adapters::State;
use crate::rules::results::Results;
use crate::rules::types::{RuleDefinition, RuleDocumentation, StateRule};

fn definition(short_code: &'static str, severity: Severity, documentation: RuleDocumentation) -> RuleDefinition {
    RuleDefinition {
        provider: Provider::Aws,
        service: "api-gateway",
        short_code,
        severity,
        required_types: &[],
        required_labels: &[],
        documentation,
    }
}

fn stages(state: &State) -> impl Iterator<Item = (&Api, &Stage)> {
    state
        .aws
        .api_gateway
        .apis
        .iter()
        .flat_map(|api| api.stages.iter().map(move |stage| (api, stage)))
}

pub fn enable_access_logging() -> StateRule {
    StateRule {
        definition: definition(
            "enable-access-logging",
            Severity::Medium,
            RuleDocumentation {
                summary: "API Gateway stages for V1 and V2 should have access logging enabled",
                explanation: "API Gateway stages should have access log settings block configured \
                    to track all access to a particular stage.",
                impact: "Logging provides vital information about access and usage",
                resolution: "Enable logging for API Gateway stages",
                bad_examples: &[r#"
resource "aws_apigatewayv2_stage" "bad_example" {
  api_id = aws_apigatewayv2_api.example.id
  name   = "example-stage"
}
"#],
                good_examples: &[r#"
resource "aws_apigatewayv2_stage" "good_example" {
  api_id = aws_apigatewayv2_api.example.id
  name   = "example-stage"

  access_log_settings {
    destination_arn = "arn:aws:logs:region:0123456789:log-group:access_logging"
    format          = "json"
  }
}
"#],
                links: &["https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/apigatewayv2_stage#access_log_settings"],
            },
        ),
        check: check_access_logging,
    }
}

fn check_access_logging(state: &State) -> Results {
    let mut results = Results::default();
    for (_, stage) in stages(state) {
        if stage.access_logging.cloudwatch_log_group_arn.is_empty() {
            results.add(
                "Access logging is not configured.",
                &stage.access_logging.cloudwatch_log_group_arn,
            );
        }
    }
    results
}

pub fn enable_cache_encryption() -> StateRule {
    StateRule {
        definition: definition(
            "enable-cache-encryption",
            Severity::Medium,
            RuleDocumentation {
                summary: "API Gateway must have cache enabled",
                explanation: "Method cache encryption ensures that any sensitive data in the cache is not vulnerable to compromise in the event of interception.",
                impact: "Data stored in the cache that is unencrypted may be vulnerable to compromise",
                resolution: "Enable cache encryption",
                bad_examples: &[r#"
resource "aws_api_gateway_method_settings" "bad_example" {
  rest_api_id = aws_api_gateway_rest_api.example.id
  stage_name  = aws_api_gateway_stage.example.stage_name
  method_path = "path1/GET"

  settings {
    metrics_enabled      = true
    logging_level        = "INFO"
    cache_data_encrypted = false
  }
}
"#],
                good_examples: &[r#"
resource "aws_api_gateway_method_settings" "good_example" {
  rest_api_id = aws_api_gateway_rest_api.example.id
  stage_name  = aws_api_gateway_stage.example.stage_name
  method_path = "path1/GET"

  settings {
    metrics_enabled      = true
    logging_level        = "INFO"
    cache_data_encrypted = true
  }
}
"#],
                links: &["https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/api_gateway_method_settings#cache_data_encrypted"],
            },
        ),
        check: check_cache_encryption,
    }
}

fn check_cache_encryption(state: &State) -> Results {
    let mut results = Results::default();
    for (api, stage) in stages(state) {
        if !api.is_rest() {
            continue;
        }
        let encrypted = &stage.rest_method_settings.cache_data_encrypted;
        if encrypted.is_false() {
            results.add("Cache data is not encrypted.", encrypted);
        }
    }
    results
}

pub fn enable_tracing() -> StateRule {
    StateRule {
        definition: definition(
            "enable-tracing",
            Severity::Low,
            RuleDocumentation {
                summary: "API Gateway must have X-Ray tracing enabled",
                explanation: "X-Ray tracing enables end-to-end debugging and analysis of all API Gateway HTTP requests.",
                impact: "Without full tracing enabled it is difficult to trace the flow of logs",
                resolution: "Enable tracing",
                bad_examples: &[r#"
resource "aws_api_gateway_stage" "bad_example" {
  stage_name           = "prod"
  rest_api_id          = aws_api_gateway_rest_api.test.id
  deployment_id        = aws_api_gateway_deployment.test.id
  xray_tracing_enabled = false
}
"#],
                good_examples: &[r#"
resource "aws_api_gateway_stage" "good_example" {
  stage_name           = "prod"
  rest_api_id          = aws_api_gateway_rest_api.test.id
  deployment_id        = aws_api_gateway_deployment.test.id
  xray_tracing_enabled = true
}
"#],
                links: &["https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/api_gateway_stage#xray_tracing_enabled"],
            },
        ),
        check: check_tracing,
    }
}

fn check_tracing(state: &State) -> Results {
    let mut results = Results::default();
    for (api, stage) in stages(state) {
        if api.is_rest() && stage.xray_tracing_enabled.is_false() {
            results.add("X-Ray tracing is not enabled.", &stage.xray_tracing_enabled);
        }
    }
    results
}

pub fn no_public_access() -> StateRule {
    StateRule {
        definition: definition(
            "no-public-access",
            Severity::Low,
            RuleDocumentation {
                summary: "No unauthorized access to API Gateway methods",
                explanation: "API Gateway methods should generally be protected by authorization or api key. \
                    OPTION verb calls can be used without authorization.",
                impact: "API gateway methods can be accessed without authorization.",
                resolution: "Use and authorization method or require API Key",
                bad_examples: &[r#"
resource "aws_api_gateway_method" "bad_example" {
  rest_api_id   = aws_api_gateway_rest_api.SampleAPI.id
  resource_id   = aws_api_gateway_resource.SampleResource.id
  http_method   = "GET"
  authorization = "NONE"
}
"#],
                good_examples: &[r#"
resource "aws_api_gateway_method" "good_example" {
  rest_api_id   = aws_api_gateway_rest_api.SampleAPI.id
  resource_id   = aws_api_gateway_resource.SampleResource.id
  http_method   = "GET"
  authorization = "AWS_IAM"
}
"#],
                links: &["https://registry.terraform.io/providers/hashicorp/aws/latest/docs/resources/api_gateway_method#authorization"],
            },
        ),
        check: check_no_public_access,
    }
}

fn check_no_public_access(state: &State) -> Results {
    let mut results = Results::default();
    for api in &state.aws.api_gateway.apis {
        for method in &api.rest_methods {
            if method.http_method.eq_str("OPTIONS") {
                continue;
            }
            if method.authorization_type.eq_str("NONE") && method.api_key_required.is_false() {
                results.add("Authorization is not enabled for this method.", &method.authorization_type);
            }
        }
    }
    results
}
