use csvsql::ast::{
    Assignment, BinaryOperator, CreateTable, Delete, InsertInto, OrderBy, Select, Update,
};
use csvsql::{Column, Config, DataType, Database, ExecResult, Expression, Statement};
use log::{LevelFilter, error};

fn main() {
    let config = Config::default().with_log_level(LevelFilter::Debug);
    if let Err(e) = csvsql::logging::init(&config) {
        eprintln!("could not install logger: {e}");
    }
    let mut db = Database::with_config(config);

    let statements = vec![
        Statement::Create(CreateTable {
            name: "users".into(),
            columns: vec![
                Column::primary_key("id", DataType::Int),
                Column::new("name", DataType::Varchar(16)),
                Column::new("age", DataType::Int),
            ],
        }),
        Statement::Insert(InsertInto {
            into: "users".into(),
            columns: vec![],
            values: vec![
                Expression::number(1),
                Expression::string("Alice"),
                Expression::number(30),
            ],
        }),
        Statement::Insert(InsertInto {
            into: "users".into(),
            columns: vec!["age".into(), "id".into(), "name".into()],
            values: vec![
                Expression::number(17),
                Expression::number(2),
                Expression::string("Bob"),
            ],
        }),
        // duplicate key, rejected
        Statement::Insert(InsertInto {
            into: "users".into(),
            columns: vec![],
            values: vec![
                Expression::number(1),
                Expression::string("Mallory"),
                Expression::number(40),
            ],
        }),
        Statement::Update(Update {
            table: "users".into(),
            assignments: vec![Assignment::new(
                "age",
                Expression::binary(Expression::ident("age"), BinaryOperator::Plus, Expression::number(1)),
            )],
            where_clause: Some(Expression::ident("name").equals(Expression::string("Bob"))),
        }),
        Statement::Select(
            Select::new(vec![Expression::Wildcard], "users").order_by(OrderBy::desc(Expression::ident("age"))),
        ),
        Statement::Delete(Delete {
            from: "users".into(),
            where_clause: Some(Expression::binary(
                Expression::ident("age"),
                BinaryOperator::Lt,
                Expression::number(18),
            )),
        }),
        Statement::Select(Select::new(
            vec![
                Expression::ident("name"),
                Expression::binary(Expression::ident("age"), BinaryOperator::Mul, Expression::number(12)),
            ],
            "users",
        )),
    ];

    for statement in &statements {
        println!("> {statement}");
        match db.execute(statement) {
            Ok(ExecResult::Rows(result)) => {
                println!("{}", result.columns.join(" | "));
                for row in result.rows {
                    let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                    println!("{}", cells.join(" | "));
                }
            }
            Ok(result) => println!("{result:?}"),
            Err(e) => error!("{e}"),
        }
    }
}
