use spannerdiff::{
    CancelToken, DatabaseConfig, FileCatalog, FilterConfig, MemoryCatalog, Options, Plan, PlanOp,
    RunError, RunOutcome, diff_schemas, filter_schema, generate_ddls, parse_schema, plan_changes,
    render_schema, run,
};

fn plan(current: &str, desired: &str) -> Plan {
    generate_ddls(desired, current, &FilterConfig::default()).unwrap()
}

fn sqls(plan: &Plan) -> Vec<&str> {
    plan.statements.iter().map(|s| s.sql.as_str()).collect()
}

fn options(desired: &str) -> Options {
    Options {
        desired_ddls: desired.to_string(),
        enable_drop: true,
        ..Options::default()
    }
}

/// Applies the desired DDLs to the catalog and returns the plan that was
/// executed.
fn reconcile(catalog: &mut MemoryCatalog, desired: &str) -> Plan {
    match run(catalog, &options(desired), &CancelToken::new()).unwrap() {
        RunOutcome::Applied { plan } | RunOutcome::NoChange { plan } => plan,
        outcome => panic!("unexpected outcome: {outcome:?}"),
    }
}

// ---- Concrete scenarios ------------------------------------------------

#[test]
fn add_column_emits_alters_in_declared_order() {
    let plan = plan(
        "CREATE TABLE Users (Id INT64 NOT NULL, Name STRING(100)) PRIMARY KEY (Id);",
        "CREATE TABLE Users (
            Id INT64 NOT NULL,
            Name STRING(100),
            Email STRING(255),
            CreatedAt TIMESTAMP
        ) PRIMARY KEY (Id);",
    );
    assert_eq!(
        sqls(&plan),
        vec![
            "ALTER TABLE Users ADD COLUMN Email STRING(255)",
            "ALTER TABLE Users ADD COLUMN CreatedAt TIMESTAMP",
        ]
    );
}

#[test]
fn interleaved_child_waits_for_its_parent() {
    // Posts is listed before Users on purpose.
    let plan = plan(
        "",
        "CREATE TABLE Posts (
            UserId INT64 NOT NULL,
            PostId INT64 NOT NULL,
            Title STRING(MAX)
        ) PRIMARY KEY (UserId, PostId),
        INTERLEAVE IN PARENT Users ON DELETE CASCADE;
        CREATE TABLE Users (UserId INT64 NOT NULL) PRIMARY KEY (UserId);",
    );
    let sql = sqls(&plan);
    assert!(sql[0].starts_with("CREATE TABLE Users"));
    assert!(sql[1].starts_with("CREATE TABLE Posts"));
}

#[test]
fn index_drops_before_its_table() {
    let plan = plan(
        "CREATE TABLE Posts (Id INT64 NOT NULL, UserId INT64) PRIMARY KEY (Id);
         CREATE INDEX IdxPostsUserId ON Posts (UserId);",
        "",
    );
    assert_eq!(
        sqls(&plan),
        vec!["DROP INDEX IdxPostsUserId", "DROP TABLE Posts"]
    );
}

#[test]
fn check_constraint_modification_recreates_it() {
    let plan = plan(
        "CREATE TABLE Products (
            Id INT64 NOT NULL,
            Price INT64,
            CONSTRAINT CK_Products_Price CHECK (Price >= 0)
        ) PRIMARY KEY (Id);",
        "CREATE TABLE Products (
            Id INT64 NOT NULL,
            Price INT64,
            CONSTRAINT CK_Products_Price CHECK (Price >= 0 AND Price <= 1000000)
        ) PRIMARY KEY (Id);",
    );
    assert_eq!(
        sqls(&plan),
        vec![
            "ALTER TABLE Products DROP CONSTRAINT CK_Products_Price",
            "ALTER TABLE Products ADD CONSTRAINT CK_Products_Price CHECK (Price >= 0 AND Price <= 1000000)",
        ]
    );
}

#[test]
fn skip_listed_tables_are_invisible() {
    let filter = FilterConfig {
        target_tables: vec![],
        skip_tables: vec!["Posts".into()],
    };
    let desired = "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);
                   CREATE TABLE Posts (Id INT64 NOT NULL) PRIMARY KEY (Id);";
    let plan = generate_ddls(desired, "", &filter).unwrap();
    let sql = sqls(&plan);
    assert_eq!(sql.len(), 1);
    assert!(sql[0].starts_with("CREATE TABLE Users"));
}

#[test]
fn storing_index_is_idempotent() {
    let desired = "CREATE TABLE Users (
        Id INT64 NOT NULL,
        Name STRING(100),
        Email STRING(255),
        Age INT64
    ) PRIMARY KEY (Id);
    CREATE INDEX IdxUsersName ON Users (Name) STORING (Email, Age);";

    let mut catalog = MemoryCatalog::new();
    let first = reconcile(&mut catalog, desired);
    assert_eq!(first.statements.len(), 2);

    let second = reconcile(&mut catalog, desired);
    assert!(second.is_empty());
}

// ---- Property-style checks ---------------------------------------------

const CORPUS: &[&str] = &[
    "",
    "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);",
    "CREATE TABLE Users (
        Id INT64 NOT NULL,
        Name STRING(100),
        Active BOOL NOT NULL DEFAULT (TRUE),
        CreatedAt TIMESTAMP NOT NULL DEFAULT (CURRENT_TIMESTAMP()),
        Tags ARRAY<STRING(50)>,
        Profile JSON
    ) PRIMARY KEY (Id);
    CREATE UNIQUE NULL_FILTERED INDEX IdxUsersName ON Users (Name) STORING (Active);",
    "CREATE TABLE Users (UserId INT64 NOT NULL) PRIMARY KEY (UserId);
     CREATE TABLE Posts (
        UserId INT64 NOT NULL,
        PostId INT64 NOT NULL,
        ExpiredAt TIMESTAMP,
        CONSTRAINT CK_Posts_PostId CHECK (PostId > 0)
     ) PRIMARY KEY (UserId, PostId),
     INTERLEAVE IN PARENT Users ON DELETE CASCADE,
     ROW DELETION POLICY (OLDER_THAN(ExpiredAt, INTERVAL 30 DAY));",
    "CREATE TABLE Categories (Id INT64 NOT NULL) PRIMARY KEY (Id);
     CREATE TABLE Products (
        Id INT64 NOT NULL,
        CategoryId INT64,
        Price NUMERIC,
        CONSTRAINT FK_Products_Categories FOREIGN KEY (CategoryId)
            REFERENCES Categories (Id) ON DELETE NO ACTION
     ) PRIMARY KEY (Id);",
];

#[test]
fn parse_render_parse_round_trip() {
    for ddl in CORPUS {
        let schema = parse_schema(ddl).unwrap();
        let rendered = render_schema(&schema);
        assert_eq!(
            parse_schema(&rendered).unwrap(),
            schema,
            "round trip failed for: {ddl}"
        );
    }
}

#[test]
fn diff_of_equal_schemas_is_empty() {
    for ddl in CORPUS {
        let schema = parse_schema(ddl).unwrap();
        assert!(diff_schemas(&schema, &schema).is_empty());
        assert!(plan_changes(&schema, &schema).unwrap().is_empty());
    }
}

#[test]
fn applying_a_plan_reaches_a_fixed_point() {
    for current in CORPUS {
        for desired in CORPUS {
            let mut catalog = MemoryCatalog::from_ddl(current).unwrap();
            reconcile(&mut catalog, desired);
            let followup = reconcile(&mut catalog, desired);
            assert!(
                followup.is_empty(),
                "plan not idempotent for current={current} desired={desired}, got {:?}",
                sqls(&followup)
            );
        }
    }
}

#[test]
fn filtering_commutes_with_diffing() {
    let a = parse_schema(CORPUS[2]).unwrap();
    let b = parse_schema(CORPUS[3]).unwrap();
    let filter = FilterConfig {
        target_tables: vec![],
        skip_tables: vec!["Posts".into()],
    };

    let filtered_diff = diff_schemas(&filter_schema(&a, &filter), &filter_schema(&b, &filter));

    let in_scope = |op: &PlanOp| {
        let table = match op {
            PlanOp::CreateTable { table } => table.name.clone(),
            PlanOp::DropTable { table } => table.clone(),
            PlanOp::CreateIndex { index } => index.table_name.clone(),
            PlanOp::DropIndex { name } => a
                .index(name)
                .or_else(|| b.index(name))
                .map(|i| i.table_name.clone())
                .unwrap_or_default(),
            PlanOp::AddColumn { table, .. }
            | PlanOp::DropColumn { table, .. }
            | PlanOp::AlterColumnType { table, .. }
            | PlanOp::AddConstraint { table, .. }
            | PlanOp::DropConstraint { table, .. } => table.clone(),
            PlanOp::Unsupported { change } => change.table.clone(),
        };
        filter.retains(&table)
    };
    let full_diff_filtered: Vec<PlanOp> = diff_schemas(&a, &b).into_iter().filter(in_scope).collect();

    assert_eq!(filtered_diff, full_diff_filtered);
}

#[test]
fn disabled_drop_gate_holds_back_every_drop() {
    let plan = plan(
        "CREATE TABLE Users (Id INT64 NOT NULL, Temp STRING(10)) PRIMARY KEY (Id);
         CREATE TABLE Old (Id INT64 NOT NULL) PRIMARY KEY (Id);
         CREATE INDEX IdxOldId ON Old (Id);",
        "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);",
    );
    let batch = plan.executable(false);
    assert!(batch.is_empty(), "every statement here is destructive: {batch:?}");

    let all = plan.executable(true);
    assert_eq!(all.len(), plan.statements.len());
    assert!(all.iter().any(|s| s.starts_with("DROP TABLE Old")));
}

#[test]
fn drop_gate_keeps_database_intact() {
    let current = "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);";
    let mut catalog = MemoryCatalog::from_ddl(current).unwrap();
    let mut opts = options("");
    opts.enable_drop = false;
    let outcome = run(&mut catalog, &opts, &CancelToken::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::Applied { .. }));
    assert!(catalog.schema().table("Users").is_some());
}

#[test]
fn interleaved_parent_created_before_child_and_dropped_after() {
    let schema = "CREATE TABLE Users (UserId INT64 NOT NULL) PRIMARY KEY (UserId);
        CREATE TABLE Posts (
            UserId INT64 NOT NULL, PostId INT64 NOT NULL
        ) PRIMARY KEY (UserId, PostId),
        INTERLEAVE IN PARENT Users ON DELETE CASCADE;";

    let create = plan("", schema);
    let create_sql = sqls(&create);
    assert!(create_sql[0].starts_with("CREATE TABLE Users"));
    assert!(create_sql[1].starts_with("CREATE TABLE Posts"));

    let drop = plan(schema, "");
    assert_eq!(sqls(&drop), vec!["DROP TABLE Posts", "DROP TABLE Users"]);
}

#[test]
fn referenced_table_created_before_referencer() {
    let plan = plan(
        "",
        "CREATE TABLE Orders (
            Id INT64 NOT NULL, UserId INT64,
            CONSTRAINT FK_Orders_Users FOREIGN KEY (UserId) REFERENCES Users (Id)
        ) PRIMARY KEY (Id);
        CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);",
    );
    let sql = sqls(&plan);
    assert!(sql[0].starts_with("CREATE TABLE Users"));
    assert!(sql[1].starts_with("CREATE TABLE Orders"));
}

// ---- Orchestrator behavior ---------------------------------------------

#[test]
fn export_returns_canonical_dump() {
    let mut catalog = MemoryCatalog::from_ddl(
        "CREATE TABLE B (Id INT64 NOT NULL) PRIMARY KEY (Id);
         CREATE TABLE A (Id INT64 NOT NULL) PRIMARY KEY (Id);",
    )
    .unwrap();
    let mut opts = options("");
    opts.export = true;
    let RunOutcome::Exported { ddl } = run(&mut catalog, &opts, &CancelToken::new()).unwrap()
    else {
        panic!("expected export outcome");
    };
    assert!(ddl.starts_with("CREATE TABLE A"));
    assert!(ddl.contains(";\n\nCREATE TABLE B"));
}

#[test]
fn dry_run_does_not_touch_the_catalog() {
    let mut catalog = MemoryCatalog::new();
    let mut opts = options("CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);");
    opts.dry_run = true;
    let outcome = run(&mut catalog, &opts, &CancelToken::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::DryRun { .. }));
    assert!(catalog.schema().is_empty());
}

#[test]
fn cancelled_token_aborts_before_any_work() {
    let mut catalog = MemoryCatalog::new();
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = run(&mut catalog, &options(""), &cancel).unwrap_err();
    assert!(matches!(err, RunError::Cancelled));
}

#[test]
fn strict_mode_promotes_unsupported_changes() {
    let current = "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);";
    let desired = "CREATE TABLE Users (Id STRING(36) NOT NULL) PRIMARY KEY (Id);";

    let mut catalog = MemoryCatalog::from_ddl(current).unwrap();
    let mut opts = options(desired);
    opts.strict = true;
    let err = run(&mut catalog, &opts, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, RunError::Unsupported { changes } if changes.len() == 1));

    // Without strict the change surfaces as a warning on an empty plan.
    let mut catalog = MemoryCatalog::from_ddl(current).unwrap();
    let outcome = run(&mut catalog, &options(desired), &CancelToken::new()).unwrap();
    let RunOutcome::NoChange { plan } = outcome else {
        panic!("expected no-change outcome");
    };
    assert_eq!(plan.unsupported.len(), 1);
}

#[test]
fn parse_errors_name_their_source() {
    let err = generate_ddls("CREATE TABLE t (", "", &FilterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("desired"));

    let err = generate_ddls("", "CREATE TABLE t (", &FilterConfig::default()).unwrap_err();
    assert!(err.to_string().contains("current"));
}

#[test]
fn schema_violations_surface_as_plan_warnings() {
    let desired = "CREATE INDEX IdxOrphan ON Missing (Id);";
    let plan = generate_ddls(desired, "", &FilterConfig::default()).unwrap();
    assert_eq!(plan.violations.len(), 1);
}

#[test]
fn file_catalog_state_survives_across_runs() {
    let root = tempfile::tempdir().unwrap();
    let database = DatabaseConfig {
        project_id: "p".into(),
        instance_id: "i".into(),
        database_id: "d".into(),
    };

    let mut catalog = FileCatalog::new(root.path(), &database);
    catalog.create_database().unwrap();
    let desired = "CREATE TABLE Users (Id INT64 NOT NULL) PRIMARY KEY (Id);";
    let outcome = run(&mut catalog, &options(desired), &CancelToken::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::Applied { .. }));

    // A second process sees the applied state and has nothing to do.
    let mut reopened = FileCatalog::new(root.path(), &database);
    let outcome = run(&mut reopened, &options(desired), &CancelToken::new()).unwrap();
    assert!(matches!(outcome, RunOutcome::NoChange { .. }));
}

#[test]
fn full_lifecycle_create_evolve_teardown() {
    let mut catalog = MemoryCatalog::new();

    let v1 = "CREATE TABLE Users (
        Id INT64 NOT NULL,
        Name STRING(100)
    ) PRIMARY KEY (Id);
    CREATE INDEX IdxUsersName ON Users (Name);";
    reconcile(&mut catalog, v1);
    assert!(catalog.schema().index("IdxUsersName").is_some());

    let v2 = "CREATE TABLE Users (
        Id INT64 NOT NULL,
        Name STRING(MAX),
        Email STRING(255)
    ) PRIMARY KEY (Id);
    CREATE UNIQUE INDEX IdxUsersName ON Users (Name);";
    let plan = reconcile(&mut catalog, v2);
    assert!(sqls(&plan).contains(&"ALTER TABLE Users ADD COLUMN Email STRING(255)"));
    assert!(catalog.schema().index("IdxUsersName").unwrap().unique);
    assert!(reconcile(&mut catalog, v2).is_empty());

    reconcile(&mut catalog, "");
    assert!(catalog.schema().is_empty());
}
