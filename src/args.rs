//! These structs provide the CLI interface for the budget CLI.

use crate::model::{Amount, Day, Kind, TransactionDraft, TransactionUpdates};
use crate::query::FilterSpec;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A command-line tool for tracking personal income and expenses.
///
/// Record what comes in and what goes out, then list it by category or date range alongside the
/// running income, expense and balance totals. Every change is saved under $BUDGET_HOME and then
/// pushed to a (simulated) remote in the background.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the data lives in $HOME/budget; pass
    /// --budget-home or set BUDGET_HOME if you want it somewhere else.
    Init,
    /// Record a new income or expense.
    Add(AddArgs),
    /// List transactions, newest first, followed by their totals.
    List(FilterArgs),
    /// Show the income, expense and balance totals without listing transactions.
    Totals(FilterArgs),
    /// Change one or more fields of an existing transaction.
    Update(UpdateArgs),
    /// Delete transactions by ID.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where budget data and configuration is held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// (Not shown): Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Either "income" or "expense".
    #[arg(long)]
    kind: Kind,

    /// The amount, greater than zero. Commas are ignored, e.g. 1,250.50
    #[arg(long, allow_negative_numbers = true)]
    amount: Amount,

    /// A free text label such as "Food" or "Salary".
    #[arg(long)]
    category: String,

    /// Optional free text notes.
    #[arg(long)]
    notes: Option<String>,

    /// The date the transaction occurred, as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        kind: Kind,
        amount: Amount,
        category: impl Into<String>,
        notes: Option<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            notes,
            date,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// The draft described by these args. A missing date becomes today's local date.
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            kind: self.kind,
            amount: self.amount,
            category: self.category.clone(),
            notes: self.notes.clone(),
            occurred_on: self
                .date
                .clone()
                .unwrap_or_else(|| Day::today().to_string()),
        }
    }
}

/// (Not shown): Args shared by the `budget list` and `budget totals` commands.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// Only include transactions whose category contains this text, ignoring case.
    #[arg(long)]
    category: Option<String>,

    /// Only include transactions on or after this date (YYYY-MM-DD).
    #[arg(long)]
    from: Option<Day>,

    /// Only include transactions on or before this date (YYYY-MM-DD).
    #[arg(long)]
    to: Option<Day>,
}

impl FilterArgs {
    pub fn new(category: Option<String>, from: Option<Day>, to: Option<Day>) -> Self {
        Self { category, from, to }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn from(&self) -> Option<Day> {
        self.from
    }

    pub fn to(&self) -> Option<Day> {
        self.to
    }

    pub fn to_filter(&self) -> FilterSpec {
        FilterSpec::new(self.category.clone(), self.from, self.to)
    }
}

/// (Not shown): Args for the `budget update` command.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The ID of the transaction to change.
    id: String,

    /// Change the kind to "income" or "expense".
    #[arg(long)]
    kind: Option<Kind>,

    /// Change the amount.
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<Amount>,

    /// Change the category.
    #[arg(long)]
    category: Option<String>,

    /// Change the notes. Pass an empty string to remove them.
    #[arg(long)]
    notes: Option<String>,

    /// Change the date (YYYY-MM-DD).
    #[arg(long)]
    date: Option<String>,
}

impl UpdateArgs {
    pub fn new(id: impl Into<String>, updates: TransactionUpdates) -> Self {
        Self {
            id: id.into(),
            kind: updates.kind,
            amount: updates.amount,
            category: updates.category,
            notes: updates.notes,
            date: updates.occurred_on,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn updates(&self) -> TransactionUpdates {
        TransactionUpdates {
            kind: self.kind,
            amount: self.amount,
            category: self.category.clone(),
            notes: self.notes.clone(),
            occurred_on: self.date.clone(),
        }
    }
}

/// (Not shown): Args for the `budget delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The IDs of the transactions to delete.
    #[arg(required = true, num_args = 1..)]
    ids: Vec<String>,
}

impl DeleteArgs {
    pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
