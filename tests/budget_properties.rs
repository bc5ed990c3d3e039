use monthly_budget::{
    budget::{
        record::ensure_mandatory_rent_rows, schema, BudgetRecord, DefaultTablesConfig, FlowGraph,
        LineItem, MonthKey, RentCheck, RentCheckStatus, Table, Totals, LOYER_LABEL,
        PROVISION_LABEL,
    },
    core::{
        context::AppContext,
        intent::{Intent, RenderScope},
    },
    storage::MemoryStorage,
};

fn month(raw: &str) -> MonthKey {
    raw.parse().unwrap()
}

fn memory_context(active: &str) -> AppContext {
    AppContext::bootstrap(
        Box::new(MemoryStorage::new()),
        DefaultTablesConfig::default(),
        month(active),
    )
    .0
}

#[test]
fn mandatory_rows_lead_whatever_the_input_order() {
    let inputs = vec![
        vec![],
        vec![LineItem::new("Parking", 50.0)],
        vec![
            LineItem::new(PROVISION_LABEL, 80.0),
            LineItem::new("Parking", 50.0),
            LineItem::new(LOYER_LABEL, 420.0),
        ],
        vec![
            LineItem::new(LOYER_LABEL, 1.0),
            LineItem::new(LOYER_LABEL, 2.0),
        ],
    ];
    for rows in inputs {
        let once = ensure_mandatory_rent_rows(rows);
        assert_eq!(once[0].label, LOYER_LABEL);
        assert_eq!(once[1].label, PROVISION_LABEL);
        assert_eq!(ensure_mandatory_rent_rows(once.clone()), once);
    }
}

#[test]
fn totals_hold_for_zero_and_positive_inputs() {
    for (salary, rent, charge) in [(0.0, 0.0, 0.0), (2000.0, 500.0, 300.0), (100.0, 80.0, 90.0)] {
        let mut record = BudgetRecord::new();
        record.salary = salary;
        record.rent_details[0].amount = rent;
        record.charges.push(LineItem::new("Charge", charge));

        let totals = Totals::from_record(&record);
        assert_eq!(
            totals.total_charges_global,
            totals.total_rent + totals.total_charges
        );
        assert_eq!(
            totals.disposable_income,
            totals.salary - totals.total_charges_global
        );
    }
}

#[test]
fn legacy_rent_and_variable_charges_migrate() {
    let report = schema::decode(
        r#"{"2022-05": {"rent": 500, "variableCharges": [{"label": "Internet", "amount": 40}]}}"#,
    )
    .unwrap();
    let record = report.store.get(month("2022-05")).unwrap();
    assert_eq!(record.rent_bill_total, 500.0);
    assert!(record.charges.contains(&LineItem::new("Internet", 40.0)));
}

#[test]
fn reconciliation_matches_then_mismatches() {
    let mut context = memory_context("2024-09");
    context.dispatch(Intent::SetRentBillTotal(1000.0)).unwrap();
    for (index, amount) in [(0, 400.0), (1, 100.0)] {
        context
            .dispatch(Intent::EditAmount {
                table: Table::RentDetails,
                index,
                amount,
            })
            .unwrap();
    }
    let check = context.summary().rent_check;
    assert_eq!(check.expected_share, 500.0);
    assert_eq!(check.actual, 500.0);
    assert_eq!(check.status, RentCheckStatus::Match);

    context
        .dispatch(Intent::EditAmount {
            table: Table::RentDetails,
            index: 1,
            amount: 50.0,
        })
        .unwrap();
    let check: RentCheck = context.summary().rent_check;
    assert_eq!(check.actual, 450.0);
    assert_eq!(check.status, RentCheckStatus::Mismatch);
}

#[test]
fn flow_edges_follow_category_totals() {
    let mut record = BudgetRecord::new();
    record.salary = 2000.0;
    record.rent_details[0].amount = 800.0;
    record.charges.push(LineItem::new("Insurance", 300.0));

    let flow = FlowGraph::from_record(&record);
    assert_eq!(flow.edge("Salary", "Housing").map(|e| e.amount), Some(800.0));
    assert_eq!(flow.edge("Salary", "Charges").map(|e| e.amount), Some(300.0));
    assert_eq!(
        flow.edge("Salary", "Disposable income").map(|e| e.amount),
        Some(900.0)
    );

    record.rent_details[0].amount = 0.0;
    assert!(FlowGraph::from_record(&record)
        .edge("Salary", "Housing")
        .is_none());
}

#[test]
fn duplicate_without_prior_month_leaves_store_unchanged() {
    let mut context = memory_context("2024-01");
    let before = context.store().clone();
    let scope = context.dispatch(Intent::DuplicatePreviousMonth).unwrap();
    assert_eq!(scope, RenderScope::Unchanged);
    assert_eq!(context.store(), &before);
}
