//! Example demonstrating the composer and the prepared statement lifecycle.
//!
//! Run with:
//!   cargo run --example composer -p sqlfluent
//!
//! Optional (use a MySQL server instead of an in-memory SQLite database):
//!   SQLFLUENT_DRIVER=mysql SQLFLUENT_ADDR=127.0.0.1:3306 SQLFLUENT_USER=root \
//!   SQLFLUENT_PASS=123456 SQLFLUENT_DB_NAME=test SQLFLUENT_PARAMS=charset=utf8mb4

use sqlfluent::{Composer, Config, Connection, Database, Driver, Lifecycle, Result, args};

fn print_fixtures() {
    let mut q = Composer::new();
    q.select("*")
        .from("table_bench")
        .where_("id")
        .eq("30000")
        .and("id")
        .gt("40000")
        .or("title")
        .neq("title_01")
        .limit(100, 20);
    println!("{}", q.sql().trim());

    q.clear()
        .insert_table("test_temp")
        .insert_fields("title,content")
        .insert_values("('fdsfds','fdsfd'),('vvvvvv','ddddd')");
    println!("{}", q.sql().trim());

    q.clear()
        .update_table("test_temp")
        .update_set("title='fffff',content='ccccccccccccccccccc'")
        .where_("id")
        .eq("30000")
        .or("id")
        .gt("100000");
    println!("{}", q.sql().trim());

    q.clear().select("*").from("test_temp").where_("id").in_list("31,32,33,100");
    println!("{}", q.sql().trim());
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    print_fixtures();

    let config = Config::from_env()?;
    let db = Database::connect(&config).await?;
    db.exec("DROP TABLE IF EXISTS test_temp", &[]).await?;
    let ddl = match config.driver()? {
        Driver::Sqlite => {
            "CREATE TABLE test_temp (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, content TEXT)"
        }
        Driver::Mysql => {
            "CREATE TABLE test_temp (id BIGINT AUTO_INCREMENT PRIMARY KEY, title VARCHAR(255), content TEXT)"
        }
    };
    db.exec(ddl, &[]).await?;

    let mut stmt = Lifecycle::<Database>::new();
    stmt.tx_begin(&db).await?;
    stmt.insert_table("test_temp")
        .insert_fields("title,content")
        .insert_values("(?,?)");
    for i in 0..10 {
        stmt.tx_stmt_exec(&args![format!("title_{i}"), format!("content_{i}")])
            .await?;
    }
    stmt.tx_commit().await?;

    stmt.clear().select("*").from("test_temp").where_("id").eq("?");
    let row = stmt.prepared_query_row(&db, &args![3]).await?;
    println!("row 3: {row:?}");

    stmt.clear()
        .select("id, title")
        .from("test_temp")
        .order_by("id")
        .limit_raw("?,?");
    let page = stmt.prepared_query(&db, &args![0, 5]).await?;
    println!("{}", serde_json::to_string_pretty(&page).unwrap_or_default());

    stmt.prepare_close()?;
    db.close().await;
    Ok(())
}
