use crate::db::get_connection;
use crate::error::Result;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("csvbank.db");

    println!("Company:    {}", if settings.company.is_empty() { "(not set)" } else { &settings.company });
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let profiles: i64 = conn.query_row("SELECT count(*) FROM profiles", [], |r| r.get(0))?;
        let statements: i64 = conn.query_row("SELECT count(*) FROM statements", [], |r| r.get(0))?;
        let lines: i64 = conn.query_row("SELECT count(*) FROM statement_lines", [], |r| r.get(0))?;
        let drafts: i64 = conn.query_row(
            "SELECT count(*) FROM statements WHERE state = 'draft'",
            [],
            |r| r.get(0),
        )?;
        let attachments: i64 = conn.query_row("SELECT count(*) FROM attachments", [], |r| r.get(0))?;

        println!();
        println!("Profiles:      {profiles}");
        println!("Statements:    {statements} ({drafts} draft)");
        println!("Lines:         {lines}");
        println!("Attachments:   {attachments}");
    } else {
        println!();
        println!("Database not found. Run `csvbank init` to set up.");
    }

    Ok(())
}
