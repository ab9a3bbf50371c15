//! HTTP/WebSocket (v2) API Gateway adapter.

use crate::adapters::{Adapter, State};
use crate::graph::{Block, ModuleGraph, Typed};

use super::types::{AccessLogging, Api, RestMethodSettings, Stage};

const API_TYPE: &str = "aws_apigatewayv2_api";
const STAGE_TYPE: &str = "aws_apigatewayv2_stage";

pub struct HttpApiAdapter;

impl Adapter for HttpApiAdapter {
    fn name(&self) -> &'static str {
        "aws-apigateway-v2"
    }

    fn adapt(&self, graph: &ModuleGraph, state: &mut State) {
        state.aws.api_gateway.apis.extend(adapt_apis(graph));
    }
}

pub fn adapt_apis(graph: &ModuleGraph) -> Vec<Api> {
    let mut stage_ids = graph.get_child_resource_id_map_by_type(STAGE_TYPE);
    let mut apis = Vec::new();

    for api_block in graph.get_resources_by_type(API_TYPE) {
        let metadata = api_block.metadata();
        let stages = graph
            .get_referencing_resources(api_block, STAGE_TYPE, "api_id")
            .into_iter()
            .map(|stage_block| {
                stage_ids.resolve(stage_block.id());
                adapt_stage(stage_block)
            })
            .collect();

        apis.push(Api {
            name: api_block.get_attribute("name").as_string_or_default(""),
            version: Typed::new(2, metadata.clone()),
            protocol_type: api_block
                .get_attribute("protocol_type")
                .as_string_or_default(""),
            rest_methods: Vec::new(),
            stages,
            metadata,
        });
    }

    let orphans = stage_ids.orphans();
    if !orphans.is_empty() {
        tracing::debug!(
            resource_type = STAGE_TYPE,
            orphans = orphans.len(),
            "collecting orphaned stages under an unmanaged API"
        );
        let mut orphanage = Api::unmanaged(2);
        orphanage.stages = graph
            .get_resource_by_ids(&orphans)
            .into_iter()
            .map(adapt_stage)
            .collect();
        apis.push(orphanage);
    }

    apis
}

fn adapt_stage(stage_block: &Block) -> Stage {
    let metadata = stage_block.metadata();

    let access_log = stage_block.get_block("access_log_settings");
    let access_logging = if access_log.is_not_nil() {
        AccessLogging {
            metadata: access_log.metadata(),
            cloudwatch_log_group_arn: access_log
                .get_attribute("destination_arn")
                .as_string_or_default(""),
        }
    } else {
        AccessLogging {
            metadata: metadata.clone(),
            cloudwatch_log_group_arn: Typed::defaulted(String::new(), metadata.clone()),
        }
    };

    // v2 stages have neither cache settings nor X-Ray tracing.
    Stage {
        name: stage_block.get_attribute("name").as_string_or_default(""),
        version: Typed::new(2, metadata.clone()),
        access_logging,
        rest_method_settings: RestMethodSettings {
            metadata: metadata.clone(),
            cache_data_encrypted: Typed::defaulted(false, metadata.clone()),
        },
        xray_tracing_enabled: Typed::defaulted(false, metadata.clone()),
        metadata,
    }
}
