use crate::output::OutputFormat;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a SELECT statement and print the resulting rows
    Query {
        /// SQL text, e.g. "SELECT Name FROM Contacts LIMIT 5"
        sql: String,

        #[arg(
            long,
            default_value_t = 0,
            help = "Upper bound on fetched base records (0 means no bound)"
        )]
        max_rows: u32,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the tables of the base
    Tables {
        #[arg(long, help = "Print the table descriptors as JSON")]
        json: bool,
    },
    /// Show the declared field types of a table
    Fields {
        table: String,
    },
    /// Print the translated query as JSON without contacting the service
    Translate {
        sql: String,
    },
}
