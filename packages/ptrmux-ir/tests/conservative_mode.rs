//! Conservative-mode pipeline behavior: no marker file, every access may
//! reach every candidate.

mod common;

use common::{aggregate_example, by_name, count_matching, dump, live, worked_example};
use pretty_assertions::assert_eq;
use ptrmux_ir::{
    Constant, EnumerationPipeline, GlobalIndexer, InstKind, PassConfig, PointsToResolver, RunMode,
    Type, ValueRef,
};

fn conservative_config() -> (tempfile::TempDir, PassConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = PassConfig::new().with_work_dir(dir.path());
    (dir, config)
}

#[test]
fn worked_example_rewrites_to_selection_chain() {
    let mut m = worked_example();
    let (_dir, config) = conservative_config();
    let report = EnumerationPipeline::new(config).run(&mut m).unwrap();

    assert_eq!(report.mode, RunMode::Conservative);
    assert_eq!(report.enumerable_globals, 3);
    assert_eq!(report.shadows_created, 1);

    // Shadow tag variable for the pointer global
    let shadow = m.global_by_name("P_index").expect("shadow created");
    let sv = m.global(shadow);
    assert_eq!(sv.ty, Type::Int32);
    assert_eq!(sv.initializer, Some(Constant::int32(0)));

    // `store @A, @P` becomes `store 1, @P_index`
    let tag_store = live(&m).into_iter().find(|(_, i)| {
        i.kind
            == InstKind::Store {
                value: ValueRef::Const(Constant::int32(1)),
                addr: ValueRef::Global(shadow),
            }
    });
    assert!(tag_store.is_some(), "identity store into the shadow tag");

    // `%v = load %p` becomes select(P_index_load == 2, load B, load A)
    let (cmp_id, cmp) = by_name(&m, "B_cmp").expect("comparison emitted");
    let (load_a, _) = by_name(&m, "A_load").unwrap();
    let (load_b, _) = by_name(&m, "B_load").unwrap();
    let (tag_load, tag_inst) = by_name(&m, "P_index_load").unwrap();
    assert_eq!(tag_inst.kind, InstKind::Load {
        addr: ValueRef::Global(shadow),
    });
    assert_eq!(cmp.kind, InstKind::ICmpEq {
        lhs: ValueRef::Const(Constant::int32(2)),
        rhs: ValueRef::Inst(tag_load),
    });
    let (_, select) = by_name(&m, "B_select").expect("selection emitted");
    assert_eq!(select.kind, InstKind::Select {
        cond: ValueRef::Inst(cmp_id),
        on_true: ValueRef::Inst(load_b),
        on_false: ValueRef::Inst(load_a),
    });

    assert_eq!(report.rewritten, 2);
    assert_eq!(report.stats.accesses, 3);
    assert_eq!(report.stats.candidates, 4);
}

#[test]
fn fully_replaced_accesses_are_erased() {
    let mut m = worked_example();
    let (_dir, config) = conservative_config();
    let report = EnumerationPipeline::new(config).run(&mut m).unwrap();

    // The original loads and the original store are gone
    assert!(by_name(&m, "p").is_none());
    assert!(by_name(&m, "v").is_none());
    let p = m.global_by_name("P").unwrap();
    let a = m.global_by_name("A").unwrap();
    let original_store = live(&m).into_iter().find(|(_, i)| {
        i.kind
            == InstKind::Store {
                value: ValueRef::Global(a),
                addr: ValueRef::Global(p),
            }
    });
    assert!(original_store.is_none());
    assert_eq!(report.erased, 3);
}

#[test]
fn conservative_resolution_is_total() {
    let mut m = worked_example();
    let index = GlobalIndexer::new().run(&mut m);
    let table = PointsToResolver::new(&index).resolve_conservative(&m);

    for id in m.all_inst_ids() {
        let inst = m.inst(id).unwrap();
        if inst.is_load() || inst.is_store() || inst.is_gep() {
            assert_eq!(table.of_inst(id), index.candidates());
        }
    }
    assert_eq!(table.resolved_instructions(), 3);
}

#[test]
fn aggregate_candidates_route_through_address_computation() {
    let mut m = aggregate_example();
    let (_dir, config) = conservative_config();
    let report = EnumerationPipeline::new(config).run(&mut m).unwrap();

    let tab = m.global_by_name("tab").unwrap();
    let arr = m.global_by_name("arr").unwrap();

    // Synthesized geps carry a zero prefix, then the original literal index
    let (tab_gep, tab_gep_inst) = by_name(&m, "gtab_gep").expect("gep into tab");
    assert_eq!(tab_gep_inst.kind, InstKind::Gep {
        base: ValueRef::Global(tab),
        indices: vec![
            ValueRef::Const(Constant::int64(0)),
            ValueRef::Const(Constant::int64(3)),
        ],
    });
    let (_, tab_load) = by_name(&m, "gtab_load").unwrap();
    assert_eq!(tab_load.kind, InstKind::Load {
        addr: ValueRef::Inst(tab_gep),
    });

    // Second aggregate candidate gets its own synthesized gep
    let (_, arr_gep) = by_name(&m, "garr_gep").expect("gep into arr");
    assert!(matches!(
        arr_gep.kind,
        InstKind::Gep { base: ValueRef::Global(g), .. } if g == arr
    ));

    // Chain keyed on the rewritten tag, second candidate's index is 2
    let (tag_load, _) = by_name(&m, "P_index_load").unwrap();
    let (_, cmp) = by_name(&m, "garr_cmp").unwrap();
    assert_eq!(cmp.kind, InstKind::ICmpEq {
        lhs: ValueRef::Inst(tag_load),
        rhs: ValueRef::Const(Constant::int32(2)),
    });
    assert!(by_name(&m, "garr_select").is_some());

    // Scalar pointer candidate never shows up in the aggregate chain
    assert!(by_name(&m, "P_index_gep").is_none());

    // Original access chain is gone, including the superseded gep
    assert!(by_name(&m, "p").is_none());
    assert!(by_name(&m, "g").is_none());
    assert!(by_name(&m, "v").is_none());
    assert_eq!(report.rewritten, 2);
}

#[test]
fn multi_index_address_computations_pass_through() {
    let mut m = ptrmux_ir::Module::new("multi_index");
    m.add_global(ptrmux_ir::GlobalVariable::new(
        "tab",
        Type::array_of(Type::Int32, 4),
        ptrmux_ir::Linkage::External,
    ));
    let p = m.add_global(ptrmux_ir::GlobalVariable::new(
        "P",
        Type::Int32.pointer_to(),
        ptrmux_ir::Linkage::External,
    ));
    {
        let mut f = ptrmux_ir::FunctionBuilder::new(&mut m, "main");
        let loaded = f.load("p", ValueRef::Global(p));
        let gep = f.gep("g2", loaded, vec![
            ValueRef::Const(Constant::int64(0)),
            ValueRef::Const(Constant::int64(1)),
        ]);
        f.load("v2", gep);
    }

    let (_dir, config) = conservative_config();
    let report = EnumerationPipeline::new(config).run(&mut m).unwrap();

    // Only the direct tag load was rewritten; the two-level access stayed
    assert_eq!(report.rewritten, 1);
    assert!(by_name(&m, "v2").is_some());
    assert_eq!(
        count_matching(&m, |k| matches!(k, InstKind::Select { .. })),
        0
    );
}

#[test]
fn selection_chain_folds_left_and_falls_through_to_first() {
    let mut m = ptrmux_ir::Module::new("three_candidates");
    let a = m.add_global(ptrmux_ir::GlobalVariable::new(
        "A",
        Type::Int32,
        ptrmux_ir::Linkage::External,
    ));
    m.add_global(ptrmux_ir::GlobalVariable::new(
        "B",
        Type::Int32,
        ptrmux_ir::Linkage::External,
    ));
    m.add_global(ptrmux_ir::GlobalVariable::new(
        "C",
        Type::Int32,
        ptrmux_ir::Linkage::External,
    ));
    let p = m.add_global(ptrmux_ir::GlobalVariable::new(
        "P",
        Type::Int32.pointer_to(),
        ptrmux_ir::Linkage::External,
    ));
    {
        let mut f = ptrmux_ir::FunctionBuilder::new(&mut m, "main");
        f.store(ValueRef::Global(a), ValueRef::Global(p));
        let loaded = f.load("p", ValueRef::Global(p));
        f.load("v", loaded);
    }

    let (_dir, config) = conservative_config();
    EnumerationPipeline::new(config).run(&mut m).unwrap();

    // v rewrites to select(tag==3, C, select(tag==2, B, A)): the false legs
    // bottom out at the first candidate's load
    let (b_select, b_select_inst) = by_name(&m, "B_select").unwrap();
    let (a_load, _) = by_name(&m, "A_load").unwrap();
    let (b_load, _) = by_name(&m, "B_load").unwrap();
    let (c_load, _) = by_name(&m, "C_load").unwrap();
    assert!(matches!(
        b_select_inst.kind,
        InstKind::Select { ref on_true, ref on_false, .. }
            if *on_true == ValueRef::Inst(b_load) && *on_false == ValueRef::Inst(a_load)
    ));
    let (_, c_select_inst) = by_name(&m, "C_select").unwrap();
    assert!(matches!(
        c_select_inst.kind,
        InstKind::Select { ref on_true, ref on_false, .. }
            if *on_true == ValueRef::Inst(c_load) && *on_false == ValueRef::Inst(b_select)
    ));
}

#[test]
fn rerunning_on_identical_modules_is_deterministic() {
    let run = |mut m: ptrmux_ir::Module| {
        let (_dir, config) = conservative_config();
        EnumerationPipeline::new(config).run(&mut m).unwrap();
        dump(&m)
    };
    assert_eq!(run(worked_example()), run(worked_example()));
    assert_eq!(run(aggregate_example()), run(aggregate_example()));
}
