//! Command-line client for the Asideka API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use asideka_client::ClientSettings;
use asideka_client::api::businesses::BusinessListParams;
use asideka_client::api::due_diligence::DueDiligenceFilter;
use asideka_client::api::posts::PostListParams;
use asideka_client::api::policies::NewsFilter;
use asideka_client::api::search::SearchRequest;
use asideka_client::domain::ports::TracingNotifier;
use asideka_client::domain::route_guard::evaluate;
use asideka_client::domain::{LoginCredentials, SessionContext};
use asideka_client::query::{Hooks, QueryState};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Report, Result, eyre};
use pagination::PageRequest;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::info;

const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "asideka",
    about = "Query the Asideka business-networking API",
    version
)]
struct Cli {
    /// Account e-mail used to sign in before running the command.
    #[arg(long = "email", value_name = "EMAIL", global = true, requires = "password")]
    email: Option<String>,
    /// Account password used with `--email`.
    #[arg(long = "password", value_name = "PASSWORD", global = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Sign in and print the session profile.
    Login,
    /// List businesses.
    Businesses {
        #[command(flatten)]
        page: PageArgs,
        /// Restrict to one category id.
        #[arg(long = "category", value_name = "ID")]
        category_id: Option<String>,
        /// Free-text filter.
        #[arg(long = "query", value_name = "TEXT")]
        query: Option<String>,
    },
    /// List posts.
    Posts {
        #[command(flatten)]
        page: PageArgs,
        /// Restrict to one business id.
        #[arg(long = "business", value_name = "ID")]
        business_id: Option<String>,
    },
    /// Search businesses and posts.
    Search {
        /// Search text.
        query: String,
        /// Maximum number of results.
        #[arg(long = "limit", value_name = "COUNT")]
        limit: Option<u32>,
    },
    /// List due-diligence requests.
    DueDiligence {
        #[command(flatten)]
        page: PageArgs,
        /// Free-text filter.
        #[arg(long = "query", value_name = "TEXT")]
        query: Option<String>,
    },
    /// List business news.
    News {
        /// Maximum number of articles.
        #[arg(long = "limit", value_name = "COUNT")]
        limit: Option<u32>,
        /// News category.
        #[arg(long = "category", value_name = "NAME")]
        category: Option<String>,
    },
    /// Show the navigation guard decision for a path.
    Guard {
        /// Requested path, e.g. `/dashboard/posts`.
        path: String,
        /// Evaluate as a signed-in visitor.
        #[arg(long = "signed-in")]
        signed_in: bool,
    },
}

#[derive(Debug, Clone, Copy, clap::Args)]
struct PageArgs {
    /// Page number, starting at 1.
    #[arg(long = "page", value_name = "N", default_value_t = 1)]
    page: u32,
    /// Items per page.
    #[arg(long = "limit", value_name = "COUNT", default_value_t = DEFAULT_LIMIT)]
    limit: u32,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        Self::new(args.page, args.limit)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSummary<'a> {
    id: &'a str,
    email: &'a str,
    display_name: &'a str,
    role: Option<&'a str>,
    business_id: Option<&'a str>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    asideka_client::telemetry::init();
    let cli = Cli::parse();

    if let Command::Guard { path, signed_in } = &cli.command {
        return print_guard(path, *signed_in);
    }

    let settings = ClientSettings::from_environment().wrap_err("load client settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build tokio runtime")?;
    runtime.block_on(run(cli, &settings))
}

async fn run(cli: Cli, settings: &ClientSettings) -> Result<()> {
    let hooks = settings
        .connect(SessionContext::default(), Arc::new(TracingNotifier))
        .wrap_err("connect to the Asideka API")?;

    match (cli.email.as_deref(), cli.password.as_deref()) {
        (Some(email), Some(password)) => sign_in(&hooks, email, password).await?,
        _ if matches!(cli.command, Command::Login) => {
            return Err(eyre!("login requires --email and --password"));
        }
        _ => {}
    }

    match cli.command {
        Command::Login => {
            let session = hooks
                .session()
                .current()
                .ok_or_else(|| eyre!("no session after login"))?;
            let profile = session.profile();
            print_json(&SessionSummary {
                id: &profile.id,
                email: &profile.email,
                display_name: &profile.display_name,
                role: profile.role.as_deref(),
                business_id: profile.business_id.as_deref(),
            })
        }
        Command::Businesses {
            page,
            category_id,
            query,
        } => {
            let params = BusinessListParams {
                page: page.into(),
                category_id,
                query,
                ..BusinessListParams::default()
            };
            print_state(hooks.businesses(params).fetch().await)
        }
        Command::Posts { page, business_id } => {
            let params = PostListParams {
                page: page.into(),
                business_id,
                ..PostListParams::default()
            };
            print_state(hooks.posts(params).fetch().await)
        }
        Command::Search { query, limit } => {
            let request = SearchRequest {
                limit,
                ..SearchRequest::new(query)
            };
            print_state(hooks.search(request).fetch().await)
        }
        Command::DueDiligence { page, query } => {
            let filter = DueDiligenceFilter {
                limit: Some(page.limit),
                page: Some(page.page),
                query,
            };
            print_state(hooks.due_diligence_requests(filter).fetch().await)
        }
        Command::News { limit, category } => {
            print_state(hooks.business_news(NewsFilter { limit, category }).fetch().await)
        }
        Command::Guard { path, signed_in } => print_guard(&path, signed_in),
    }
}

async fn sign_in(hooks: &Hooks, email: &str, password: &str) -> Result<()> {
    let credentials = LoginCredentials::try_from_parts(email, password)
        .map_err(|err| eyre!("invalid credentials: {err}"))?;
    let navigation = hooks
        .login(&credentials)
        .await
        .with_context(|| format!("sign in as {}", credentials.username()))?;
    info!(next = navigation.target(), "signed in");
    Ok(())
}

fn print_guard(path: &str, signed_in: bool) -> Result<()> {
    let decision = evaluate(signed_in, path);
    print_json(&serde_json::json!({
        "path": path,
        "redirect": decision.redirect_target(),
    }))
}

fn print_state<T: Serialize>(state: QueryState<T>) -> Result<()> {
    let data = state
        .into_result()
        .map_err(|err| Report::new(err).wrap_err("query failed"))?;
    print_json(&data.as_deref())
}

#[expect(clippy::print_stdout, reason = "command output is written to stdout")]
fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("render JSON output")?;
    println!("{rendered}");
    Ok(())
}
