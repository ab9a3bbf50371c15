//! REST (v1) API Gateway adapter.
//!
//! Parents are `aws_api_gateway_rest_api` blocks. Stages and methods attach
//! through `rest_api_id`. Method settings attach twice: through `rest_api_id`
//! as an API-wide cascade, and through `stage_name` as a per-stage override
//! that must also name the stage's own API. Stages and methods whose API is
//! absent are collected under one unmanaged API.

use crate::adapters::{cascade, Adapter, State};
use crate::graph::{Block, BoolValue, ModuleGraph, Typed};

use super::types::{
    AccessLogging, Api, RestMethod, RestMethodSettings, Stage, PROTOCOL_TYPE_REST,
};

const API_TYPE: &str = "aws_api_gateway_rest_api";
const STAGE_TYPE: &str = "aws_api_gateway_stage";
const METHOD_TYPE: &str = "aws_api_gateway_method";
const METHOD_SETTINGS_TYPE: &str = "aws_api_gateway_method_settings";

pub struct RestApiAdapter;

impl Adapter for RestApiAdapter {
    fn name(&self) -> &'static str {
        "aws-apigateway-v1"
    }

    fn adapt(&self, graph: &ModuleGraph, state: &mut State) {
        state.aws.api_gateway.apis.extend(adapt_apis(graph));
    }
}

pub fn adapt_apis(graph: &ModuleGraph) -> Vec<Api> {
    let mut stage_ids = graph.get_child_resource_id_map_by_type(STAGE_TYPE);
    let mut method_ids = graph.get_child_resource_id_map_by_type(METHOD_TYPE);
    let mut apis = Vec::new();

    for api_block in graph.get_resources_by_type(API_TYPE) {
        let metadata = api_block.metadata();
        let mut api = Api {
            name: api_block.get_attribute("name").as_string_or_default(""),
            version: Typed::new(1, metadata.clone()),
            protocol_type: Typed::defaulted(PROTOCOL_TYPE_REST.to_string(), metadata.clone()),
            rest_methods: Vec::new(),
            stages: Vec::new(),
            metadata,
        };

        for method_block in graph.get_referencing_resources(api_block, METHOD_TYPE, "rest_api_id") {
            method_ids.resolve(method_block.id());
            api.rest_methods.push(adapt_method(method_block));
        }

        // The API-wide cascade has to be known before any stage is adapted.
        let inherited = api_wide_cache_encryption(graph, api_block);

        for stage_block in graph.get_referencing_resources(api_block, STAGE_TYPE, "rest_api_id") {
            stage_ids.resolve(stage_block.id());
            api.stages.push(adapt_stage(graph, stage_block, Some(api_block), inherited.clone()));
        }

        apis.push(api);
    }

    let orphaned_stages = stage_ids.orphans();
    let orphaned_methods = method_ids.orphans();
    if !orphaned_stages.is_empty() || !orphaned_methods.is_empty() {
        tracing::debug!(
            stages = orphaned_stages.len(),
            methods = orphaned_methods.len(),
            "collecting orphaned REST children under an unmanaged API"
        );
        let mut orphanage = Api::unmanaged(1);
        for method_block in graph.get_resource_by_ids(&orphaned_methods) {
            orphanage.rest_methods.push(adapt_method(method_block));
        }
        for stage_block in graph.get_resource_by_ids(&orphaned_stages) {
            orphanage.stages.push(adapt_stage(graph, stage_block, None, None));
        }
        apis.push(orphanage);
    }

    apis
}

fn adapt_method(method: &Block) -> RestMethod {
    RestMethod {
        metadata: method.metadata(),
        http_method: method.get_attribute("http_method").as_string_or_default(""),
        authorization_type: method.get_attribute("authorization").as_string_or_default(""),
        api_key_required: method.get_attribute("api_key_required").as_bool_or_default(false),
    }
}

/// `cache_data_encrypted` from the last settings block attached to the API.
fn api_wide_cache_encryption(graph: &ModuleGraph, api_block: &Block) -> Option<BoolValue> {
    graph
        .get_referencing_resources(api_block, METHOD_SETTINGS_TYPE, "rest_api_id")
        .into_iter()
        .filter_map(declared_cache_encryption)
        .last()
}

fn declared_cache_encryption(method_settings: &Block) -> Option<BoolValue> {
    let encrypted = method_settings
        .get_block("settings")
        .get_attribute("cache_data_encrypted");
    encrypted
        .is_not_nil()
        .then(|| encrypted.as_bool_or_default(false))
}

/// Whether a settings block found through `stage_name` belongs to the same API
/// as the stage. Stage names repeat across APIs, so the name alone is not
/// enough. Orphaned stages only take settings that point at no REST API.
fn settings_share_api(graph: &ModuleGraph, method_settings: &Block, parent: Option<&Block>) -> bool {
    match parent {
        Some(api_block) => graph.attribute_resolves_to(method_settings, "rest_api_id", api_block),
        None => !graph
            .get_resources_by_type(API_TYPE)
            .into_iter()
            .any(|api_block| graph.attribute_resolves_to(method_settings, "rest_api_id", api_block)),
    }
}

fn adapt_stage(
    graph: &ModuleGraph,
    stage_block: &Block,
    parent: Option<&Block>,
    inherited: Option<BoolValue>,
) -> Stage {
    let metadata = stage_block.metadata();

    let mut settings_metadata = metadata.clone();
    let mut explicit = None;
    for method_settings in graph
        .get_referencing_resources(stage_block, METHOD_SETTINGS_TYPE, "stage_name")
        .into_iter()
        .filter(|settings| settings_share_api(graph, settings, parent))
    {
        settings_metadata = method_settings.metadata();
        if let Some(encrypted) = declared_cache_encryption(method_settings) {
            explicit = Some(encrypted);
        }
    }

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

    Stage {
        name: stage_block.get_attribute("stage_name").as_string_or_default(""),
        version: Typed::new(1, metadata.clone()),
        access_logging,
        rest_method_settings: RestMethodSettings {
            metadata: settings_metadata,
            cache_data_encrypted: cascade(
                Typed::defaulted(false, metadata.clone()),
                inherited,
                explicit,
            ),
        },
        xray_tracing_enabled: stage_block
            .get_attribute("xray_tracing_enabled")
            .as_bool_or_default(false),
        metadata,
    }
}
