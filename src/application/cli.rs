use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Password;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AppEntry;
use crate::domain::models::Template;
use crate::domain::models::TemplateType;
use crate::domain::services::preview;
use crate::domain::services::substitution;
use crate::domain::services::AuthService;
use crate::domain::services::Drafts;
use crate::infrastructure::api::TemplateApi;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_template(template: &Template) -> String {
    return format!(
        "- ({}) {} \"{}\" v{}, {}, from {}",
        template.template_type,
        template.template_id,
        template.name,
        template.version,
        template.app_entry,
        template.from,
    );
}

fn template_address(matches: &ArgMatches) -> Result<(TemplateType, String, AppEntry)> {
    let type_str = matches.get_one::<String>("type").unwrap();
    let Some(template_type) = TemplateType::parse(type_str) else {
        bail!(format!("{type_str} is not a valid template type"));
    };

    let app_entry_str = matches.get_one::<String>("app-entry").unwrap();
    let Some(app_entry) = AppEntry::parse(app_entry_str) else {
        bail!(format!("{app_entry_str} is not a valid app entry"));
    };

    let template_id = matches.get_one::<String>("id").unwrap().to_string();
    return Ok((template_type, template_id, app_entry));
}

async fn login_interactive() -> Result<()> {
    let email: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Email")
        .interact_text()?;
    let password = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Password")
        .interact()?;

    let mut auth = AuthService::default();
    if auth.login(&email, &password).await {
        let name = auth.state().user.as_ref().unwrap().name.to_string();
        println!("{}", Paint::green(format!("Signed in as {name}")));
    } else {
        let reason = auth
            .state()
            .error
            .clone()
            .unwrap_or_else(|| return "Login failed".to_string());
        bail!(reason);
    }

    return Ok(());
}

async fn print_whoami() -> Result<()> {
    let mut auth = AuthService::default();
    auth.check_auth_status().await;

    match &auth.state().user {
        Some(user) => {
            println!("{} <{}> ({})", user.name, user.email, user.role.label());
        }
        None => {
            println!("Not signed in.");
        }
    }

    return Ok(());
}

async fn print_templates_list(matches: &ArgMatches) -> Result<()> {
    let filter = matches
        .get_one::<String>("type")
        .and_then(|type_str| return TemplateType::parse(type_str));

    let templates = TemplateApi::default().list(filter).await?;
    if templates.is_empty() {
        println!("There are no templates yet. You should create your first one!");
        return Ok(());
    }

    let lines = templates
        .iter()
        .map(|template| {
            return format_template(template);
        })
        .collect::<Vec<String>>();
    println!("{}", lines.join("\n"));

    return Ok(());
}

async fn print_template_detail(matches: &ArgMatches) -> Result<()> {
    let (template_type, template_id, app_entry) = template_address(matches)?;
    let template = TemplateApi::default()
        .get(template_type, &template_id, app_entry)
        .await?;

    println!("{}", Paint::new(&template.name).bold());
    println!("Type: {} ({})", template.template_type, app_entry.label());
    println!("From: {}", template.from);
    println!("Subject: {}", template.subject);
    println!("Version: {}", template.metadata.version);
    if !template.metadata.description.is_empty() {
        println!("Description: {}", template.metadata.description);
    }
    if !template.metadata.tags.is_empty() {
        println!("Tags: {}", template.metadata.tags.join(", "));
    }
    if !template.variables.is_empty() {
        println!("Variables:");
        for variable in &template.variables {
            let required = if variable.required { ", required" } else { "" };
            println!("  - {} ({}{required})", variable.name, variable.variable_type);
        }
    }

    return Ok(());
}

async fn print_template_preview(matches: &ArgMatches) -> Result<()> {
    let (template_type, template_id, app_entry) = template_address(matches)?;
    let template = TemplateApi::default()
        .get(template_type, &template_id, app_entry)
        .await?;

    let bindings = substitution::sample_bindings(&template.variables);
    let subject = substitution::substitute(
        &template.subject,
        &bindings,
        substitution::OutputKind::Text,
    );
    let html = substitution::substitute(
        &template.html_content,
        &bindings,
        substitution::OutputKind::Text,
    );

    println!("{}", Paint::new(format!("Subject: {subject}")).bold());
    println!();
    let rendered = preview::html_to_lines(&preview::sanitize_html(&html));
    println!("{}", rendered.join("\n"));

    return Ok(());
}

async fn delete_template(matches: &ArgMatches) -> Result<()> {
    let (template_type, template_id, app_entry) = template_address(matches)?;

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Permanently delete {template_type}/{template_id}? This cannot be undone."
        ))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    let deleted = TemplateApi::default()
        .delete(template_type, &template_id, app_entry)
        .await?;
    println!("Deleted template {}", deleted.template_id);

    return Ok(());
}

async fn print_drafts_list() -> Result<()> {
    let drafts = Drafts::for_template(None);
    let keys = Drafts::list(&drafts.cache_dir).await;

    if keys.is_empty() {
        println!("There are no drafts.");
    } else {
        let lines = keys
            .iter()
            .map(|key| return format!("- {key}"))
            .collect::<Vec<String>>();
        println!("{}", lines.join("\n"));
    }

    return Ok(());
}

async fn delete_drafts(matches: &ArgMatches) -> Result<()> {
    if let Some(key) = matches.get_one::<String>("draft-id") {
        let template_id = if key == "new" { None } else { Some(key.as_str()) };
        Drafts::for_template(template_id).clear().await?;
        println!("Deleted draft {key}");
        return Ok(());
    }

    let drafts = Drafts::for_template(None);
    for key in Drafts::list(&drafts.cache_dir).await {
        let template_id = if key == "new" { None } else { Some(key.as_str()) };
        Drafts::new(drafts.cache_dir.clone(), template_id)
            .clear()
            .await?;
    }
    println!("Deleted all drafts");

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Maildeck")
        .hide(true)
        .subcommand(Command::new("log-path").about(
            "Output path to debug log file generated when running Maildeck with environment variable RUST_LOG=maildeck",
        ))
        .subcommand(Command::new("enum-config").about("List all config keys as strings."));
}

fn arg_template_type(required: bool) -> Arg {
    return Arg::new("type")
        .short('t')
        .long("type")
        .help("Template type.")
        .num_args(1)
        .required(required)
        .value_parser(PossibleValuesParser::new(TemplateType::VARIANTS));
}

fn arg_template_id() -> Arg {
    return Arg::new("id")
        .short('i')
        .long("id")
        .help("Template ID.")
        .num_args(1)
        .required(true);
}

fn arg_app_entry() -> Arg {
    return Arg::new("app-entry")
        .short('a')
        .long("app-entry")
        .help("Application the template belongs to.")
        .num_args(1)
        .required(true)
        .value_parser(PossibleValuesParser::new(AppEntry::VARIANTS));
}

fn subcommand_templates() -> Command {
    return Command::new("templates")
        .about("Inspect and manage stored templates without entering the console.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List all templates, optionally filtered by type.")
                .arg(arg_template_type(false)),
        )
        .subcommand(
            Command::new("show")
                .about("Print a template's metadata and variables.")
                .arg(arg_template_type(true))
                .arg(arg_template_id())
                .arg(arg_app_entry()),
        )
        .subcommand(
            Command::new("preview")
                .about("Render a template locally with generated sample data.")
                .arg(arg_template_type(true))
                .arg(arg_template_id())
                .arg(arg_app_entry()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a template. Asks for confirmation first.")
                .arg(arg_template_type(true))
                .arg(arg_template_id())
                .arg(arg_app_entry()),
        );
}

fn subcommand_drafts() -> Command {
    return Command::new("drafts")
        .about("Manage locally stored template drafts.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the drafts cache directory path."))
        .subcommand(Command::new("list").about("List all stored drafts by template id."))
        .subcommand(
            Command::new("delete")
                .about("Delete one or all drafts.")
                .arg(
                    clap::Arg::new("draft-id")
                        .short('i')
                        .long("id")
                        .help("Template ID the draft belongs to, or \"new\".")
                        .num_args(1),
                )
                .arg(
                    clap::Arg::new("all")
                        .long("all")
                        .help("Delete all drafts.")
                        .num_args(0),
                )
                .group(
                    ArgGroup::new("delete-args")
                        .args(["draft-id", "all"])
                        .required(true),
                ),
        );
}

fn subcommand_console() -> Command {
    return Command::new("console").about("Open the template console. This is the default when no command is given.");
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("maildeck")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(false)
        .subcommand(subcommand_console())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("login").about("Sign in and store the session token."))
        .subcommand(Command::new("logout").about("Sign out and discard the session token."))
        .subcommand(Command::new("whoami").about("Print the signed-in user."))
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .subcommand(subcommand_templates())
        .subcommand(subcommand_drafts())
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .short('u')
                .long(ConfigKey::ApiUrl.to_string())
                .env("MAILDECK_API_URL")
                .num_args(1)
                .help(format!(
                    "Template API base URL. [default: {}]",
                    Config::default(ConfigKey::ApiUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("MAILDECK_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DraftAutosaveDelay.to_string())
                .long(ConfigKey::DraftAutosaveDelay.to_string())
                .env("MAILDECK_DRAFT_AUTOSAVE_DELAY")
                .num_args(1)
                .help(format!(
                    "Milliseconds of editor inactivity before a draft is saved. [default: {}]",
                    Config::default(ConfigKey::DraftAutosaveDelay)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::DraftDir.to_string())
                .long(ConfigKey::DraftDir.to_string())
                .env("MAILDECK_DRAFT_DIR")
                .num_args(1)
                .help(format!(
                    "Directory drafts are stored in. [default: {}]",
                    Config::default(ConfigKey::DraftDir)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("MAILDECK_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!(
                    "API request timeout in milliseconds. [default: {}]",
                    Config::default(ConfigKey::RequestTimeout)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::TokenFile.to_string())
                .long(ConfigKey::TokenFile.to_string())
                .env("MAILDECK_TOKEN_FILE")
                .num_args(1)
                .help(format!(
                    "File the session token is stored in. [default: {}]",
                    Config::default(ConfigKey::TokenFile)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir().unwrap().join("maildeck/debug.log");
                    println!("{}", log_path.to_str().unwrap());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(false);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("login", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            login_interactive().await?;
            return Ok(false);
        }
        Some(("logout", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            AuthService::default().logout().await;
            println!("Signed out.");
            return Ok(false);
        }
        Some(("whoami", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            print_whoami().await?;
            return Ok(false);
        }
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        Some(("templates", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("list", list_matches)) => {
                    Config::load(build(), vec![&matches, list_matches]).await?;
                    print_templates_list(list_matches).await?;
                }
                Some(("show", show_matches)) => {
                    Config::load(build(), vec![&matches, show_matches]).await?;
                    print_template_detail(show_matches).await?;
                }
                Some(("preview", preview_matches)) => {
                    Config::load(build(), vec![&matches, preview_matches]).await?;
                    print_template_preview(preview_matches).await?;
                }
                Some(("delete", delete_matches)) => {
                    Config::load(build(), vec![&matches, delete_matches]).await?;
                    delete_template(delete_matches).await?;
                }
                _ => {
                    subcommand_templates().print_long_help()?;
                }
            }
            return Ok(false);
        }
        Some(("drafts", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("dir", dir_matches)) => {
                    Config::load(build(), vec![&matches, dir_matches]).await?;
                    let dir = Drafts::for_template(None)
                        .cache_dir
                        .to_string_lossy()
                        .to_string();
                    println!("{dir}");
                }
                Some(("list", list_matches)) => {
                    Config::load(build(), vec![&matches, list_matches]).await?;
                    print_drafts_list().await?;
                }
                Some(("delete", delete_matches)) => {
                    Config::load(build(), vec![&matches, delete_matches]).await?;
                    delete_drafts(delete_matches).await?;
                }
                _ => {
                    subcommand_drafts().print_long_help()?;
                }
            }
            return Ok(false);
        }
        Some(("console", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
