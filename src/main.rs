use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use solum_lp::notifier::VerbosityLevel;
use solum_lp::{
    BuildRequest, Image, LanguagePack, Notifier, RequestContext, ShellHandler, SubprocessRunner,
    WorkerConfig,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace). Also switches to text-based progress"
    )]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Build an application image with the contrib build scripts
    Build(BuildArgs),
    /// Encode a language pack JSON document into image tags
    Encode {
        #[arg(help = "Language pack JSON file (stdin when omitted)")]
        file: Option<PathBuf>,
    },
    /// Decode an image JSON document into a language pack
    Decode {
        #[arg(help = "Image JSON file (stdin when omitted)")]
        file: Option<PathBuf>,

        #[arg(long, default_value = "http://localhost:9777", help = "Base URL for resource URIs")]
        host_url: String,
    },
}

#[derive(Args)]
struct BuildArgs {
    #[arg(long, help = "Source repository URL (e.g., git://example.com/app.git)")]
    source_url: String,

    #[arg(long, help = "Name of the application to build")]
    app_name: String,

    #[arg(long, help = "Tenant the build runs for")]
    tenant: String,

    #[arg(long, default_value = "", help = "User the build runs for")]
    user: String,

    #[arg(long, help = "Auth token handed to the build script")]
    auth_token: Option<String>,

    #[arg(long, default_value = "heroku", help = "Source format (heroku or dib)")]
    source_format: String,

    #[arg(long, default_value = "docker", help = "Image format (docker or qcow2)")]
    image_format: String,

    #[arg(long, default_value = "auto", help = "Base image id, or 'auto' for the format default")]
    base_image: String,

    #[arg(long, default_value_t = 0)]
    build_id: i64,

    #[arg(long, default_value_t = 0)]
    assembly_id: i64,

    #[arg(long, help = "Directory containing contrib/ (defaults to the source tree)")]
    project_dir: Option<PathBuf>,

    #[arg(long, help = "Identity service URL exported as OS_AUTH_URL")]
    auth_url: Option<String>,

    #[arg(long, help = "Image service URL exported as OS_IMAGE_URL")]
    image_url: Option<String>,

    #[arg(long, help = "Print the build command without running it")]
    dry_run: bool,
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn build(args: BuildArgs, notifier: &Notifier) -> Result<()> {
    let mut config = WorkerConfig {
        auth_url: args.auth_url,
        image_url: args.image_url,
        ..WorkerConfig::default()
    };
    if let Some(project_dir) = &args.project_dir {
        config = config.with_project_dir(project_dir);
    }
    debug!("Worker config: {:?}", config);

    let mut ctx = RequestContext::new(&args.tenant, &args.user);
    if let Some(token) = &args.auth_token {
        ctx = ctx.with_auth_token(token);
    }

    let request = BuildRequest {
        build_id: args.build_id,
        source_url: args.source_url,
        app_name: args.app_name,
        base_image_id: args.base_image,
        source_format: args.source_format,
        image_format: args.image_format,
        assembly_id: args.assembly_id,
    };

    let handler = ShellHandler::new(config, SubprocessRunner::new(), notifier, notifier);

    if args.dry_run {
        let command = handler.build_command(&ctx, &request)?;
        println!("{}", command);
        return Ok(());
    }

    match handler.build(&ctx, &request)? {
        Some(image_id) => {
            println!("{}", image_id);
            Ok(())
        }
        None => Err(anyhow!("Build {} did not create an image", request.build_id)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbosity = VerbosityLevel::from(cli.verbose);
    env_logger::Builder::from_env(Env::default())
        .filter_level(verbosity.to_log_level())
        .init();

    let notifier = Notifier::new(cli.verbose);
    info!("Starting solum-lp");

    match cli.command {
        Command::Build(args) => build(args, &notifier),
        Command::Encode { file } => {
            let input = read_input(file.as_ref())?;
            let lp: LanguagePack =
                serde_json::from_str(&input).context("Failed to parse language pack JSON")?;
            println!("{}", serde_json::to_string_pretty(&lp.as_image_dict()?)?);
            Ok(())
        }
        Command::Decode { file, host_url } => {
            let input = read_input(file.as_ref())?;
            let image: Image = serde_json::from_str(&input).context("Failed to parse image JSON")?;
            let lp = LanguagePack::from_image(&image, &host_url);
            println!("{}", serde_json::to_string_pretty(&lp)?);
            Ok(())
        }
    }
}
