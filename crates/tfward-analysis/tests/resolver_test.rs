//! Reference resolution tests: traversals, literal identity matches, module
//! scoping, one-hop semantics.

use tfward_analysis::graph::{Block, ModuleGraph, ModulePath, RawBlock, RawFile, RawModule};

// ---- Helpers ----

const API: &str = "aws_api_gateway_rest_api";
const STAGE: &str = "aws_api_gateway_stage";

fn graph(blocks: Vec<RawBlock>) -> ModuleGraph {
    ModuleGraph::from_blocks("main.tf", blocks)
}

fn ids(blocks: Vec<&Block>) -> Vec<String> {
    blocks.into_iter().map(|b| b.id().to_string()).collect()
}

fn referencing(graph: &ModuleGraph, target: &str, ref_type: &str, attr: &str) -> Vec<String> {
    let target = graph.get_block_by_id(target).unwrap();
    ids(graph.get_referencing_resources(target, ref_type, attr))
}

// ---- Traversals ----

#[test]
fn traversal_reference_resolves() {
    let g = graph(vec![
        RawBlock::resource(API, "api"),
        RawBlock::resource(STAGE, "prod").with_ref("rest_api_id", "aws_api_gateway_rest_api.api.id"),
        RawBlock::resource(STAGE, "other").with_ref("rest_api_id", "aws_api_gateway_rest_api.nope.id"),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.prod"]
    );
}

#[test]
fn only_the_named_attribute_and_type_count() {
    let g = graph(vec![
        RawBlock::resource(API, "api"),
        RawBlock::resource(STAGE, "wrong_attr").with_ref("parent", "aws_api_gateway_rest_api.api.id"),
        RawBlock::resource("aws_api_gateway_method", "m").with_ref("rest_api_id", "aws_api_gateway_rest_api.api.id"),
    ]);
    assert!(referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id").is_empty());
    assert_eq!(
        referencing(&g, "aws_api_gateway_rest_api.api", "aws_api_gateway_method", "rest_api_id"),
        vec!["aws_api_gateway_method.m"]
    );
}

#[test]
fn list_values_resolve_when_any_element_does() {
    let g = graph(vec![
        RawBlock::resource("aws_security_group", "sg"),
        RawBlock::resource("aws_instance", "web").with_attr(
            "vpc_security_group_ids",
            vec![
                tfward_analysis::graph::Value::from("sg-123"),
                tfward_analysis::graph::Reference::parse("aws_security_group.sg.id").into(),
            ],
        ),
    ]);
    assert_eq!(
        referencing(&g, "aws_security_group.sg", "aws_instance", "vpc_security_group_ids"),
        vec!["aws_instance.web"]
    );
}

// ---- Literal identity ----

#[test]
fn literal_address_resolves() {
    let g = graph(vec![
        RawBlock::resource(API, "api"),
        RawBlock::resource(STAGE, "s").with_attr("rest_api_id", "aws_api_gateway_rest_api.api"),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.s"]
    );
}

#[test]
fn literal_name_or_id_resolves() {
    let g = graph(vec![
        RawBlock::resource(API, "api").with_attr("name", "payments").with_attr("id", "a1b2c3"),
        RawBlock::resource(STAGE, "by_name").with_attr("rest_api_id", "payments"),
        RawBlock::resource(STAGE, "by_id").with_attr("rest_api_id", "a1b2c3"),
        RawBlock::resource(STAGE, "neither").with_attr("rest_api_id", "billing"),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.by_name", "aws_api_gateway_stage.by_id"]
    );
}

#[test]
fn same_named_attribute_resolves() {
    let g = graph(vec![
        RawBlock::resource(STAGE, "prod").with_attr("stage_name", "prod"),
        RawBlock::resource("aws_api_gateway_method_settings", "all").with_attr("stage_name", "prod"),
        RawBlock::resource("aws_api_gateway_method_settings", "dev").with_attr("stage_name", "dev"),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_stage.prod", "aws_api_gateway_method_settings", "stage_name"),
        vec!["aws_api_gateway_method_settings.all"]
    );
}

#[test]
fn empty_strings_never_match() {
    let g = graph(vec![
        RawBlock::resource(API, "api").with_attr("name", ""),
        RawBlock::resource(STAGE, "s").with_attr("rest_api_id", ""),
    ]);
    assert!(referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id").is_empty());
}

#[test]
fn target_never_references_itself() {
    let g = graph(vec![
        RawBlock::resource(STAGE, "a").with_attr("stage_name", "prod"),
        RawBlock::resource(STAGE, "b").with_attr("stage_name", "prod"),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_stage.a", STAGE, "stage_name"),
        vec!["aws_api_gateway_stage.b"]
    );
}

// ---- Modules ----

#[test]
fn relative_references_stay_inside_their_module() {
    let g = ModuleGraph::from_modules([
        RawModule::root(vec![RawFile::new(
            "main.tf",
            vec![
                RawBlock::resource(API, "this"),
                RawBlock::resource(STAGE, "root_stage").with_ref("rest_api_id", "aws_api_gateway_rest_api.this.id"),
            ],
        )]),
        RawModule::nested(
            ModulePath::new(["api"]),
            vec![RawFile::new(
                "api.tf",
                vec![
                    RawBlock::resource(API, "this"),
                    RawBlock::resource(STAGE, "mod_stage").with_ref("rest_api_id", "aws_api_gateway_rest_api.this.id"),
                ],
            )],
        ),
    ]);
    assert_eq!(
        referencing(&g, "aws_api_gateway_rest_api.this", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.root_stage"]
    );
    assert_eq!(
        referencing(&g, "module.api.aws_api_gateway_rest_api.this", STAGE, "rest_api_id"),
        vec!["module.api.aws_api_gateway_stage.mod_stage"]
    );
}

#[test]
fn absolute_references_cross_module_boundaries() {
    let g = ModuleGraph::from_modules([
        RawModule::root(vec![RawFile::new(
            "main.tf",
            vec![RawBlock::resource(STAGE, "root_stage")
                .with_ref("rest_api_id", "module.api.aws_api_gateway_rest_api.this.id")],
        )]),
        RawModule::nested(
            ModulePath::new(["api"]),
            vec![RawFile::new("api.tf", vec![RawBlock::resource(API, "this")])],
        ),
    ]);
    assert_eq!(
        referencing(&g, "module.api.aws_api_gateway_rest_api.this", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.root_stage"]
    );
}

#[test]
fn nested_module_output_falls_back_to_the_module_call() {
    // `module.net.subnet.id` has no block at `module.net.subnet.id`, so it
    // reads as output `subnet.id` of the `net` call.
    let g = graph(vec![
        RawBlock::module("net"),
        RawBlock::resource("aws_instance", "web").with_ref("subnet_id", "module.net.subnet.id"),
    ]);
    assert_eq!(referencing(&g, "module.net", "aws_instance", "subnet_id"), vec!["aws_instance.web"]);

    let net = g.get_block_by_id("module.net").unwrap();
    let web = g.get_block_by_id("aws_instance.web").unwrap();
    assert!(g.attribute_resolves_to(web, "subnet_id", net));
}

#[test]
fn absolute_reading_wins_when_the_block_exists() {
    let g = ModuleGraph::from_modules([
        RawModule::root(vec![RawFile::new(
            "main.tf",
            vec![
                RawBlock::module("api"),
                RawBlock::resource(STAGE, "root_stage")
                    .with_ref("rest_api_id", "module.api.aws_api_gateway_rest_api.this.id"),
            ],
        )]),
        RawModule::nested(
            ModulePath::new(["api"]),
            vec![RawFile::new("api.tf", vec![RawBlock::resource(API, "this")])],
        ),
    ]);
    assert_eq!(
        referencing(&g, "module.api.aws_api_gateway_rest_api.this", STAGE, "rest_api_id"),
        vec!["aws_api_gateway_stage.root_stage"]
    );
    assert!(referencing(&g, "module.api", STAGE, "rest_api_id").is_empty());
}

// ---- One hop ----

#[test]
fn resolution_is_one_hop_and_tolerates_cycles() {
    let g = graph(vec![
        RawBlock::resource("t", "a").with_ref("peer", "t.b.id"),
        RawBlock::resource("t", "b").with_ref("peer", "t.c.id"),
        RawBlock::resource("t", "c").with_ref("peer", "t.a.id"),
    ]);
    assert_eq!(referencing(&g, "t.c", "t", "peer"), vec!["t.b"]);
    assert_eq!(referencing(&g, "t.a", "t", "peer"), vec!["t.c"]);
}

#[test]
fn variables_are_not_references() {
    let g = graph(vec![
        RawBlock::resource(API, "api"),
        RawBlock::resource(STAGE, "s").with_ref("rest_api_id", "var.api_id"),
    ]);
    assert!(referencing(&g, "aws_api_gateway_rest_api.api", STAGE, "rest_api_id").is_empty());
}

#[test]
fn index_and_direct_check_agree() {
    let g = graph(vec![
        RawBlock::resource(API, "api").with_attr("name", "payments"),
        RawBlock::resource(STAGE, "a").with_ref("rest_api_id", "aws_api_gateway_rest_api.api.id"),
        RawBlock::resource(STAGE, "b").with_attr("rest_api_id", "payments"),
        RawBlock::resource(STAGE, "c").with_attr("rest_api_id", "other"),
    ]);
    let target = g.get_block_by_id("aws_api_gateway_rest_api.api").unwrap();
    let via_index = ids(g.get_referencing_resources(target, STAGE, "rest_api_id"));
    let direct: Vec<String> = g
        .get_resources_by_type(STAGE)
        .into_iter()
        .filter(|b| g.attribute_resolves_to(b, "rest_api_id", target))
        .map(|b| b.id().to_string())
        .collect();
    assert_eq!(via_index, direct);
}
