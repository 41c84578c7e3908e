use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared_types::invitation::PDF_FILE_NAME;
use shared_types::{Contact, ContactPayload, InvitationRequest};
use std::path::{Path, PathBuf};

use campaign_api::config::ApiConfig;
use campaign_api::helpers::contact_filter::{city_options, role_options, ContactFilter};
use campaign_api::BackendClient;

#[derive(Parser, Debug)]
#[command(name = "campaign-client", about = "Manage contacts and meeting invitations")]
struct Cli {
    /// Backend base URL; defaults to BACKEND_URL, API_BASE_URL, the config file, then http://localhost:8080
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Contacts(ContactsCommand),
    #[command(subcommand)]
    Invitations(InvitationsCommand),
}

#[derive(Subcommand, Debug)]
enum ContactsCommand {
    /// List contacts, optionally filtered
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        city: String,
        /// Print the available role and city filter values instead
        #[arg(long)]
        options: bool,
    },
    Show {
        id: i64,
    },
    Create(CreateArgs),
    /// Send only the given fields
    Update(UpdateArgs),
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    consent: bool,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    consent: Option<bool>,
}

#[derive(Subcommand, Debug)]
enum InvitationsCommand {
    /// Render the invitation as HTML
    Preview(InvitationArgs),
    /// Render the invitation as PDF
    Pdf(InvitationArgs),
}

#[derive(Args, Debug)]
struct InvitationArgs {
    /// JSON file holding the invitation
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Replace the agenda with the lines of this file
    #[arg(long, value_name = "PATH")]
    agenda_file: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let base_url = match cli.api_base {
        Some(url) => url,
        None => {
            let (config, _) = ApiConfig::load().context("Failed to load config")?;
            config.client_base_url()
        }
    };
    let client = BackendClient::new(&base_url);
    tracing::debug!("Using backend {}", client.base_url());

    match cli.command {
        Command::Contacts(command) => run_contacts(&client, command).await,
        Command::Invitations(command) => run_invitations(&client, command).await,
    }
}

async fn run_contacts(client: &BackendClient, command: ContactsCommand) -> Result<()> {
    match command {
        ContactsCommand::List {
            search,
            role,
            city,
            options,
        } => {
            let contacts = client
                .list_contacts()
                .await
                .context("Failed to load contacts")?;

            if options {
                println!("Rollen: {}", role_options(&contacts).join(", "));
                println!("Städte: {}", city_options(&contacts).join(", "));
                return Ok(());
            }

            let filter = ContactFilter { search, role, city };
            let found = filter.apply(&contacts);
            for contact in &found {
                print_row(contact);
            }
            if found.is_empty() {
                println!("Keine Ansprechpartner gefunden.");
            }
        }
        ContactsCommand::Show { id } => {
            let contact = client
                .get_contact(id)
                .await
                .context("Failed to load contact")?;
            println!("{}", serde_json::to_string_pretty(&contact)?);
        }
        ContactsCommand::Create(args) => {
            let contact = Contact {
                id: None,
                first_name: args.first_name,
                last_name: args.last_name,
                role: args.role.unwrap_or_default(),
                city: args.city.unwrap_or_default(),
                email: args.email.unwrap_or_default(),
                phone: args.phone.unwrap_or_default(),
                tags: String::new(),
                consent: args.consent,
                consent_date: None,
                last_touch: None,
                next_followup: None,
            };
            contact.validate()?;

            let created = client
                .create_contact(ContactPayload::from(&contact))
                .await
                .context("Failed to create")?;
            print_row(&created);
        }
        ContactsCommand::Update(args) => {
            let payload = ContactPayload {
                name: args.name,
                email: args.email,
                role: args.role,
                city: args.city,
                phone: args.phone,
                consent: args.consent,
                ..ContactPayload::default()
            };
            let updated = client
                .update_contact(args.id, payload)
                .await
                .context("Failed to update")?;
            print_row(&updated);
        }
        ContactsCommand::Delete { id } => {
            client
                .delete_contact(id)
                .await
                .context("Failed to delete")?;
            println!("Ansprechpartner {id} gelöscht.");
        }
    }

    Ok(())
}

async fn run_invitations(client: &BackendClient, command: InvitationsCommand) -> Result<()> {
    match command {
        InvitationsCommand::Preview(args) => {
            let invitation = read_invitation(&args)?;
            let html = client
                .preview_invitation(&invitation)
                .await
                .context("Preview failed")?;

            match args.out {
                Some(out) => {
                    std::fs::write(&out, html)
                        .with_context(|| format!("Failed to write {:?}", out))?;
                    println!("Vorschau gespeichert: {}", out.display());
                }
                None => println!("{html}"),
            }
        }
        InvitationsCommand::Pdf(args) => {
            let invitation = read_invitation(&args)?;
            let pdf = client
                .invitation_pdf(&invitation)
                .await
                .context("PDF failed")?;

            let out = args.out.unwrap_or_else(|| PathBuf::from(PDF_FILE_NAME));
            std::fs::write(&out, pdf).with_context(|| format!("Failed to write {:?}", out))?;
            println!("PDF gespeichert: {}", out.display());
        }
    }

    Ok(())
}

fn read_invitation(args: &InvitationArgs) -> Result<InvitationRequest> {
    let mut invitation: InvitationRequest = read_json(&args.input)?;
    if let Some(agenda_file) = &args.agenda_file {
        let text = std::fs::read_to_string(agenda_file)
            .with_context(|| format!("Failed to read {:?}", agenda_file))?;
        invitation.set_agenda_text(&text);
    }
    invitation.validate()?;
    Ok(invitation)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn print_row(contact: &Contact) {
    let id = contact.id.map(|id| id.to_string()).unwrap_or_default();
    let name = contact.display_name();
    println!(
        "{:>5}  {:<28} {:<28} {:<16} {}",
        id,
        if name.is_empty() { "—" } else { name.as_str() },
        or_dash(&contact.email),
        or_dash(&contact.role),
        or_dash(&contact.city),
    );
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
