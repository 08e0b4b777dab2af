#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Statement {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub state: String,
    pub end_balance: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct StatementLine {
    pub id: i64,
    pub statement_id: i64,
    pub date: String,
    pub description: String,
    pub amount: f64,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub state: String,
}
