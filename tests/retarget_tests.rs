mod common;

use bpretarget::{
    retarget_batch, retarget_graph, retarget_graph_with_config, BlueprintGraph, ClassWarning, ConnectionVerdict,
    Issue, NodeId, NodeKind, NodeStatus, PinDirection, PinId, PinType, RetargetConfig, RetargetError, Summary, Symbol,
    SymbolScope,
};

use common::{init_tracing, registry, Builder};

#[test]
fn unresolved_setter_is_quarantined_and_its_links_severed() {
    init_tracing();
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let set_x = b.set("X", PinType::Int);
    let fire = b.call("Fire", vec![], vec![]);
    b.chain(&begin, &[&set_x, &fire]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    let report = &output.report;

    assert!(report.issues.contains(&(
        set_x.id,
        Issue::UnresolvedSymbol {
            symbol: "Property:X".to_string()
        }
    )));
    assert_eq!(report.outcome(set_x.id).unwrap().status, NodeStatus::Failed);
    assert!(!report.is_success());

    assert!(output.graph.node(set_x.id).is_none());
    assert_eq!(output.graph.connection_count(), 0);
    assert_eq!(report.connections.orphaned, 2);
    assert!(report.dropped.iter().all(|d| d.verdict == ConnectionVerdict::Orphaned));

    assert_eq!(output.quarantined.len(), 1);
    assert_eq!(output.quarantined[0].id, set_x.id);

    // The survivors migrated cleanly; an orphaned link does not count against them.
    assert_eq!(report.outcome(begin.id).unwrap().status, NodeStatus::Migrated);
    assert_eq!(report.outcome(fire.id).unwrap().status, NodeStatus::Migrated);
}

#[test]
fn fully_resolvable_chain_migrates_unchanged() {
    init_tracing();
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let fire = b.call("Fire", vec![], vec![]);
    let set_ammo = b.set("Ammo", PinType::Int);
    b.chain(&begin, &[&fire, &set_ammo]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();

    assert_eq!(
        output.report.summary,
        Summary {
            migrated: 3,
            warning: 0,
            failed: 0,
            unreachable: 0,
        }
    );
    assert_eq!(output.report.connections.valid, 2);
    assert_eq!(output.graph.connection_count(), 2);
    assert!(output.report.issues.is_empty());
    assert!(output.quarantined.is_empty());
    assert_eq!(output.graph.parent_class.as_deref(), Some("Pawn"));
    assert_eq!(output.graph.generated_class.as_deref(), Some("BP_Hero_C"));
    assert_eq!(output.report.processing_order, vec![begin.id, fire.id, set_ammo.id]);
    output.graph.validate_structure().unwrap();
}

#[test]
fn renamed_property_binds_with_warning() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let set_speed = b.set("Speed", PinType::Float);
    let (get_hp, hp) = b.get("Hp", PinType::Float);
    b.chain(&begin, &[&set_speed]);
    b.link(hp, set_speed.inputs[0]);

    let config = RetargetConfig::default().with_rename("Property:Hp", "Health");
    let output = retarget_graph_with_config(&b.graph, &reg, "Pawn", &config).unwrap();

    let outcome = output.report.outcome(get_hp).unwrap();
    assert_eq!(outcome.status, NodeStatus::MigratedWithWarning);
    assert_eq!(
        outcome.issues,
        vec![Issue::CoercedBinding {
            from: "Property:Hp".to_string(),
            to: "Property:Health".to_string(),
        }]
    );

    match &output.graph.node(get_hp).unwrap().kind {
        NodeKind::VariableGet { variable } => assert_eq!(variable.name, "Health"),
        other => panic!("unexpected kind {:?}", other),
    }
    assert_eq!(output.report.connections.valid, 2);
}

#[test]
fn narrowed_generic_param_drops_the_incoming_link() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let print = b.call("Print", vec![PinType::Wildcard], vec![]);
    let (get_ammo, ammo) = b.get("Ammo", PinType::Int);
    b.chain(&begin, &[&print]);
    b.link(ammo, print.inputs[0]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    let report = &output.report;

    assert_eq!(report.connections.valid, 1);
    assert_eq!(report.connections.incompatible, 1);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].verdict, ConnectionVerdict::Incompatible);

    let retyped = output.graph.pin(print.inputs[0]).unwrap();
    assert_eq!(retyped.ty, PinType::String);
    assert!(retyped.links.is_empty());

    let incompatible = |node: NodeId| {
        report
            .issues
            .iter()
            .any(|(n, issue)| *n == node && matches!(issue, Issue::IncompatibleConnection { .. }))
    };
    assert!(incompatible(print.id));
    assert!(incompatible(get_ammo));
    assert_eq!(report.outcome(get_ammo).unwrap().status, NodeStatus::MigratedWithWarning);
    assert_eq!(report.summary.failed, 0);
}

#[test]
fn widened_param_is_kept_but_flagged() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let scale = b.call("Scale", vec![PinType::Int], vec![PinType::Float]);
    let (_, ammo) = b.get("Ammo", PinType::Int);
    b.chain(&begin, &[&scale]);
    b.link(ammo, scale.inputs[0]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    assert_eq!(output.report.outcome(scale.id).unwrap().status, NodeStatus::MigratedWithWarning);
    assert_eq!(output.graph.pin(scale.inputs[0]).unwrap().ty, PinType::Float);
    assert_eq!(output.report.connections.valid, 2);

    let strict = RetargetConfig {
        allow_coercion: false,
        ..RetargetConfig::default()
    };
    let output = retarget_graph_with_config(&b.graph, &reg, "Pawn", &strict).unwrap();
    assert_eq!(output.report.outcome(scale.id).unwrap().status, NodeStatus::Failed);
}

#[test]
fn event_payload_must_still_fit_its_consumers() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let tick = b.event("Tick", vec![PinType::Float]);
    let set_speed = b.set("Speed", PinType::Float);
    b.chain(&tick, &[&set_speed]);
    b.link(tick.outputs[0], set_speed.inputs[0]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    assert_eq!(output.report.summary.migrated, 2);
    assert_eq!(output.graph.connection_count(), 2);

    // The target delivers a float, which cannot feed an int consumer.
    let mut b = Builder::new("BP_Hero");
    let tick = b.event("Tick", vec![PinType::Int]);
    let set_ammo = b.set("Ammo", PinType::Int);
    b.chain(&tick, &[&set_ammo]);
    b.link(tick.outputs[0], set_ammo.inputs[0]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    assert_eq!(output.report.outcome(tick.id).unwrap().status, NodeStatus::Failed);
    assert!(output.report.issues.contains(&(
        tick.id,
        Issue::UnresolvedSymbol {
            symbol: "Event:Tick".to_string()
        }
    )));
}

#[test]
fn local_symbols_pass_through() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let local = b.graph.add_node(NodeKind::VariableGet {
        variable: Symbol::property("Combo", PinType::Int).with_scope(SymbolScope::Local),
    });
    let local_value = b.graph.add_pin(local, "value", PinType::Int, PinDirection::Output).unwrap();
    let set_ammo = b.set("Ammo", PinType::Int);
    b.chain(&begin, &[&set_ammo]);
    b.link(local_value, set_ammo.inputs[0]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    assert_eq!(output.report.outcome(local).unwrap().status, NodeStatus::Migrated);
}

#[test]
fn unreachable_nodes_are_reported_last() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let stray = b.call("Jump", vec![], vec![]);
    let begin = b.event("BeginPlay", vec![]);
    let fire = b.call("Fire", vec![], vec![]);
    b.chain(&begin, &[&fire]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    let report = &output.report;
    assert_eq!(report.processing_order, vec![begin.id, fire.id, stray.id]);
    assert_eq!(report.outcome(stray.id).unwrap().status, NodeStatus::Unreachable);
    assert!(report.issues.contains(&(stray.id, Issue::UnreachableNode)));
    assert_eq!(report.summary.unreachable, 1);
    assert!(output.graph.node(stray.id).is_some());
}

#[test]
fn dangling_link_is_malformed() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let fire = b.call("Fire", vec![], vec![]);
    b.chain(&begin, &[&fire]);

    let pins = b.graph.pins().cloned().map(|mut pin| {
        if pin.id == begin.then {
            pin.links.insert(PinId(999));
        }
        pin
    });
    let broken = BlueprintGraph::from_parts(b.graph.id, "BP_Hero", b.graph.nodes().cloned(), pins);

    let err = retarget_graph(&broken, &reg, "Pawn").unwrap_err();
    assert!(matches!(err, RetargetError::MalformedGraph { .. }));
}

#[test]
fn one_sided_link_from_host_json_is_malformed() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let fire = b.call("Fire", vec![], vec![]);
    b.chain(&begin, &[&fire]);

    // Drop the back-reference on the input side only.
    let exec = fire.exec.unwrap();
    let mut value = serde_json::to_value(&b.graph).unwrap();
    value["pins"][exec.0.to_string().as_str()]["links"] = serde_json::json!([]);
    let broken: BlueprintGraph = serde_json::from_value(value).unwrap();

    assert!(matches!(
        retarget_graph(&broken, &reg, "Pawn"),
        Err(RetargetError::MalformedGraph { .. })
    ));
}

#[test]
fn unknown_and_rejected_targets() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    b.event("BeginPlay", vec![]);

    assert!(matches!(
        retarget_graph(&b.graph, &reg, "Ghost"),
        Err(RetargetError::UnknownClass { name }) if name == "Ghost"
    ));

    // Parent still exists and is an actor, so only actor targets qualify.
    let actor_bp = b.graph.clone().with_parent("Pawn");
    assert!(matches!(
        retarget_graph(&actor_bp, &reg, "SaveGame"),
        Err(RetargetError::TargetRejected { target, .. }) if target == "SaveGame"
    ));

    let lax = RetargetConfig {
        enforce_reparenting_rules: false,
        ..RetargetConfig::default()
    };
    assert!(retarget_graph_with_config(&actor_bp, &reg, "SaveGame", &lax).is_ok());
}

#[test]
fn hierarchy_change_is_warned() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    b.event("BeginPlay", vec![]);

    let output = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    assert!(output.report.class_warnings.contains(&ClassWarning::HierarchyChange {
        from: Some("OldPawn".to_string()),
        to: "Pawn".to_string(),
    }));
}

#[test]
fn retarget_is_idempotent() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let set_x = b.set("X", PinType::Int);
    let print = b.call("Print", vec![PinType::Wildcard], vec![]);
    let (_, ammo) = b.get("Ammo", PinType::Int);
    b.chain(&begin, &[&set_x, &print]);
    b.link(ammo, print.inputs[0]);

    let first = retarget_graph(&b.graph, &reg, "Pawn").unwrap();
    let second = retarget_graph(&b.graph, &reg, "Pawn").unwrap();

    assert_eq!(
        serde_json::to_string(&first.graph).unwrap(),
        serde_json::to_string(&second.graph).unwrap()
    );
    assert_eq!(first.report.to_json().unwrap(), second.report.to_json().unwrap());
}

#[test]
fn batch_checks_rules_once_and_isolates_failures() {
    let reg = registry();
    let mut good = Builder::new("BP_A");
    let begin = good.event("BeginPlay", vec![]);
    let fire = good.call("Fire", vec![], vec![]);
    good.chain(&begin, &[&fire]);

    let pins = good.graph.pins().cloned().map(|mut pin| {
        pin.links.insert(PinId(404));
        pin
    });
    let broken = BlueprintGraph::from_parts(good.graph.id, "BP_B", good.graph.nodes().cloned(), pins);

    let graphs = vec![good.graph.clone(), broken];
    let results = retarget_batch(&graphs, &reg, "Pawn", &RetargetConfig::default()).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(RetargetError::MalformedGraph { .. })));

    let actors = vec![good.graph.clone().with_parent("Pawn"), good.graph.clone()];
    assert!(matches!(
        retarget_batch(&actors, &reg, "SaveGame", &RetargetConfig::default()),
        Err(RetargetError::TargetRejected { .. })
    ));
}

#[test]
fn mixed_batch_cannot_turn_actors_into_level_scripts() {
    let reg = registry();
    let mut b = Builder::new("BP_Mixed");
    b.event("BeginPlay", vec![]);
    let pawn_bp = b.graph.clone().with_parent("Pawn");
    let level_bp = b.graph.clone().with_parent("LevelScriptActor");
    let graphs = vec![pawn_bp, level_bp];

    assert!(matches!(
        retarget_batch(&graphs, &reg, "LevelScriptActor", &RetargetConfig::default()),
        Err(RetargetError::TargetRejected { .. })
    ));

    let results = retarget_batch(&graphs, &reg, "Pawn", &RetargetConfig::default()).unwrap();
    assert!(results.iter().all(|r| r.is_ok()));
}

#[test]
fn empty_batch_yields_no_results() {
    let reg = registry();
    let results = retarget_batch(&[], &reg, "Actor", &RetargetConfig::default()).unwrap();
    assert!(results.is_empty());

    assert!(matches!(
        retarget_batch(&[], &reg, "Ghost", &RetargetConfig::default()),
        Err(RetargetError::UnknownClass { .. })
    ));
}

#[test]
fn concurrent_runs_share_the_registry() {
    let reg = registry();
    let mut b = Builder::new("BP_Hero");
    let begin = b.event("BeginPlay", vec![]);
    let set_x = b.set("X", PinType::Int);
    let fire = b.call("Fire", vec![], vec![]);
    b.chain(&begin, &[&set_x, &fire]);
    let graph = &b.graph;
    let reg = &reg;

    let reports: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || retarget_graph(graph, reg, "Pawn").unwrap().report.to_json().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(reports.windows(2).all(|pair| pair[0] == pair[1]));
}
