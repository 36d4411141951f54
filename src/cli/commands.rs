use std::io;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::TreeSession;
use crate::cli::args::{Cli, Commands, TreeArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{MemberId, ViewportSize};
use crate::infrastructure::{JsonFileSource, MemberSource};

/// Viewport used when a command does not care about screen size.
const DEFAULT_VIEWPORT: ViewportSize = ViewportSize {
    width: 1280.0,
    height: 800.0,
};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let settings = Settings::load(cli.config.as_deref())?;
    match command {
        Commands::Tree { tree } => _tree(&settings, tree),
        Commands::Search { query, tree } => _search(&settings, query, tree),
        Commands::Year { year, tree } => _year(&settings, *year, tree),
        Commands::Fit {
            width,
            height,
            tree,
        } => _fit(&settings, ViewportSize::new(*width, *height), tree),
        Commands::Show { id, file } => _show(&settings, id, file.as_deref()),
        Commands::Config => _config(&settings),
        Commands::Completion { .. } => Ok(()),
    }
}

fn data_file(settings: &Settings, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| settings.data_file.clone())
        .ok_or_else(|| {
            CliError::Usage("no member data: pass --file or set data_file in settings".into())
        })
}

/// Load data, build the session and apply the requested expansion state.
#[instrument(level = "debug", skip(settings))]
fn open_session(
    settings: &Settings,
    args: &TreeArgs,
    size: ViewportSize,
) -> CliResult<TreeSession> {
    let source = JsonFileSource::new(data_file(settings, args.file.as_deref())?);
    debug!(source = %source.describe(), "loading members");
    let records = source.load()?;
    let mut session = TreeSession::new(records, settings, size)?;
    session.render();

    if args.collapse_all {
        session.collapse_all();
    }
    for raw in &args.collapse {
        let id = MemberId::new(raw.as_str());
        let Some(node) = session.tree().node(&id) else {
            return Err(CliError::InvalidArgs(format!("unknown member: {raw}")));
        };
        if node.is_leaf() {
            output::warning(&format!("{raw} has no sponsored members, nothing to collapse"));
        } else if node.is_expanded() {
            session.toggle(&id)?;
        }
    }
    Ok(session)
}

#[instrument(level = "debug", skip(settings))]
fn _tree(settings: &Settings, args: &TreeArgs) -> CliResult<()> {
    let session = open_session(settings, args, DEFAULT_VIEWPORT)?;
    output::info(&output::member_tree(&session, &session.highlights()));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _search(settings: &Settings, query: &str, args: &TreeArgs) -> CliResult<()> {
    let mut session = open_session(settings, args, DEFAULT_VIEWPORT)?;
    let highlights = session.search(query);
    output::info(&output::member_tree(&session, &highlights));
    output::header(&output::highlight_summary(&highlights));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _year(settings: &Settings, year: Option<i32>, args: &TreeArgs) -> CliResult<()> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let mut session = open_session(settings, args, DEFAULT_VIEWPORT)?;
    let highlights = session.filter_year(Some(year));
    output::info(&output::member_tree(&session, &highlights));
    output::header(&format!("{year}: {}", output::highlight_summary(&highlights)));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _fit(settings: &Settings, size: ViewportSize, args: &TreeArgs) -> CliResult<()> {
    let mut session = open_session(settings, args, size)?;
    if session.layout().is_empty() {
        output::warning("nothing visible to fit");
        return Ok(());
    }
    let transform = session.fit();
    if let Some(bounds) = session.layout().bounds() {
        output::action(
            "bounds",
            &format!(
                "({:.1}, {:.1}) - ({:.1}, {:.1})",
                bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
            ),
        );
    }
    output::transform(&transform);
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn _show(settings: &Settings, id: &str, file: Option<&Path>) -> CliResult<()> {
    let args = TreeArgs {
        file: file.map(Path::to_path_buf),
        ..TreeArgs::default()
    };
    let session = open_session(settings, &args, DEFAULT_VIEWPORT)?;
    let detail = session.activate(&MemberId::new(id))?;
    output::member_detail(&detail);
    Ok(())
}

fn _config(settings: &Settings) -> CliResult<()> {
    output::info(&settings.to_toml()?);
    Ok(())
}
