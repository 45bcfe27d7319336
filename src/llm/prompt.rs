//! Prompt construction for LLM requests.
//!
//! Builds the three model-facing instruction templates: natural language to
//! SQL translation, narrative report generation, and the corrective retry.
//! All templates are parameterized by the configured telemetry schema.

use crate::config::SchemaConfig;

/// Template for translating a natural-language request into a single SQL
/// statement constrained to the configured table and columns.
const SQL_TRANSLATION_TEMPLATE: &str = r#"Given this natural-language request: {request}

Translate it into a single SQL statement for the MySQL database `{database}`, table `{table}`. The table has exactly these columns:
{columns}.

Be precise: filter by dock, time, flow or pressure as the request demands, and select only the data the request needs.
Return ONLY the raw SQL statement, with no commentary, titles or code fences.

Example request for the first 10 rows:
Raw answer: 'SELECT * FROM {qualified_table} LIMIT 10;'

Example translations:

Request: "Get the average fuel flow per dock."
SQL:
SELECT muellenum, AVG(caudal) AS caudal_promedio FROM {table} GROUP BY muellenum;

Request: "Get every supply record from December 10, 2024."
SQL:
SELECT * FROM {table} WHERE tiempo = '2024-12-10';

Request: "Get the supply records for dock number 3 between December 1 and December 5."
SQL:
SELECT * FROM {table} WHERE muellenum = 3 AND tiempo BETWEEN '2024-12-01' AND '2024-12-05';"#;

/// Template for the narrative report request sent after a successful query.
const REPORT_TEMPLATE: &str = r#"{request}

Write a detailed report about the `{database}` database, table `{table}` (columns: {columns}), using this query result as your data:

{data}

Structure the report with these sections:

1. **Report summary**:
    - Key supply facts (dock, flow, supply duration, pressure).
    - Trends or anomalies over time.

2. **Data analysis**:
    - Interesting findings or patterns in the supply data.
    - Comparison between docks or between time periods.
    - Flow and pressure behavior per dock.

3. **Recommendations**:
    - Suggestions to improve fuel-supply efficiency.
    - Docks that need maintenance or capacity review.

Keep the report grounded in the data above; do not invent rows."#;

/// Corrective instruction sent after a failed SQL execution.
const CORRECTION_INSTRUCTION: &str = "That statement failed. I only want the raw SQL command, \
no commentary and no extra titles, just a single statement like SELECT ...;";

/// Builds model-facing prompts for the configured telemetry schema.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    schema: SchemaConfig,
}

impl PromptBuilder {
    /// Creates a builder for the given schema.
    pub fn new(schema: SchemaConfig) -> Self {
        Self { schema }
    }

    /// Returns the SQL-translation instruction embedding the user request.
    pub fn sql_translation(&self, request: &str) -> String {
        self.fill(SQL_TRANSLATION_TEMPLATE)
            .replace("{request}", request)
    }

    /// Returns the report instruction embedding the request and result data.
    pub fn report(&self, request: &str, data: &str) -> String {
        self.fill(REPORT_TEMPLATE)
            .replace("{request}", request)
            .replace("{data}", data)
    }

    /// Returns the corrective retry instruction.
    pub fn correction(&self) -> String {
        CORRECTION_INSTRUCTION.to_string()
    }

    /// Interpolates the schema placeholders shared by the templates.
    fn fill(&self, template: &str) -> String {
        template
            .replace("{qualified_table}", &self.schema.qualified_table())
            .replace("{database}", &self.schema.database)
            .replace("{table}", &self.schema.table)
            .replace("{columns}", &self.schema.column_list())
    }
}
