use std::error::Error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Currency, DepositMethod, DepositRule, Engine, Money, NewDepositRule, parse_scaled};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "wallet_admin")]
#[command(about = "Admin utilities for the wallet ledger (wallets, deposit rules, schema)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./wallet.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Wallet(Wallet),
    Rule(Rule),
    /// Apply or inspect schema migrations.
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[derive(Args, Debug)]
struct Wallet {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    /// Open a zero-balance wallet for a user.
    Open(WalletOpenArgs),
}

#[derive(Args, Debug)]
struct WalletOpenArgs {
    #[arg(long)]
    user: String,
    #[arg(long, default_value = "USD")]
    currency: String,
}

#[derive(Args, Debug)]
struct Rule {
    #[command(subcommand)]
    command: RuleCommand,
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    /// Add a deposit rule. The newest active rule of a method wins.
    Create(RuleCreateArgs),
    List,
    Enable { id: i32 },
    Disable { id: i32 },
}

#[derive(Args, Debug)]
struct RuleCreateArgs {
    /// `usdt_trc20` or `usdt_erc20`.
    #[arg(long)]
    method: String,
    /// Minimum amount in major units, e.g. `10`.
    #[arg(long)]
    min: String,
    /// Maximum amount in major units, e.g. `10000`.
    #[arg(long)]
    max: String,
    /// Fee as a fraction of the amount, e.g. `0.01` for 1%.
    #[arg(long, default_value = "0")]
    fee: String,
    #[arg(long, default_value_t = 30)]
    eta_minutes: i32,
    /// Overrides the confirmations reported by the address issuer.
    #[arg(long)]
    confirmations: Option<i32>,
    /// Create the rule disabled.
    #[arg(long)]
    inactive: bool,
}

impl RuleCreateArgs {
    fn to_rule(&self) -> Result<NewDepositRule, Box<dyn Error + Send + Sync>> {
        let method = DepositMethod::try_from(self.method.as_str())?;
        let currency = method.currency();
        Ok(NewDepositRule {
            method,
            min_amount_minor: Money::parse(&self.min, currency)?.amount_minor(),
            max_amount_minor: Money::parse(&self.max, currency)?.amount_minor(),
            fee_ppm: parse_scaled(&self.fee, 6)?,
            eta_minutes: self.eta_minutes,
            required_confirmations: self.confirmations,
            active: !self.inactive,
        })
    }
}

fn print_rule(rule: &DepositRule) {
    let currency = rule.method.currency();
    let confirmations = rule
        .required_confirmations
        .map_or_else(|| "issuer".to_string(), |c| c.to_string());
    println!(
        "#{} {} [{} .. {}] fee {} ppm, eta {} min, confirmations {}, {}",
        rule.id,
        rule.method,
        Money::new(rule.min_amount_minor, currency),
        Money::new(rule.max_amount_minor, currency),
        rule.fee_ppm,
        rule.eta_minutes,
        confirmations,
        if rule.active { "active" } else { "inactive" }
    );
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn migrate(
    database_url: &str,
    action: MigrateAction,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    match action {
        MigrateAction::Up => migration::Migrator::up(&db, None).await?,
        MigrateAction::Down => migration::Migrator::down(&db, None).await?,
        MigrateAction::Fresh => migration::Migrator::fresh(&db).await?,
        MigrateAction::Status => migration::Migrator::status(&db).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    if let Command::Migrate { action } = cli.command {
        return migrate(&cli.database_url, action).await;
    }

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Wallet(Wallet {
            command: WalletCommand::Open(args),
        }) => {
            let currency = Currency::try_from(args.currency.as_str())?;
            let wallet = engine.open_wallet(&args.user, currency).await?;
            println!("opened {currency} wallet for {}: {}", wallet.user_id, wallet.id);
        }
        Command::Rule(Rule { command }) => match command {
            RuleCommand::Create(args) => {
                let rule = engine.create_deposit_rule(args.to_rule()?).await?;
                print_rule(&rule);
            }
            RuleCommand::List => {
                for rule in engine.deposit_rules().await? {
                    print_rule(&rule);
                }
            }
            RuleCommand::Enable { id } => print_rule(&engine.set_deposit_rule_active(id, true).await?),
            RuleCommand::Disable { id } => {
                print_rule(&engine.set_deposit_rule_active(id, false).await?)
            }
        },
        Command::Migrate { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_amounts_are_parsed_in_major_units() {
        let args = RuleCreateArgs {
            method: "usdt_trc20".to_string(),
            min: "10".to_string(),
            max: "10000.5".to_string(),
            fee: "0.01".to_string(),
            eta_minutes: 30,
            confirmations: None,
            inactive: false,
        };

        let rule = args.to_rule().unwrap();
        assert_eq!(rule.min_amount_minor, 10_000_000);
        assert_eq!(rule.max_amount_minor, 10_000_500_000);
        assert_eq!(rule.fee_ppm, 10_000);
        assert!(rule.active);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let args = RuleCreateArgs {
            method: "btc".to_string(),
            min: "1".to_string(),
            max: "2".to_string(),
            fee: "0".to_string(),
            eta_minutes: 30,
            confirmations: None,
            inactive: false,
        };
        assert!(args.to_rule().is_err());
    }

    #[test]
    fn cli_parses_rule_toggle() {
        let cli = Cli::try_parse_from(["wallet_admin", "rule", "disable", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Rule(Rule {
                command: RuleCommand::Disable { id: 3 }
            })
        ));
    }
}
