use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use folio::config::Config;
use folio::models::{relative_time, EntityId, ProjectDraft, ServiceDraft, ServiceField};
use folio::mutation::Mutation;
use folio::{ClientContext, ClientError};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version, about = "Portfolio site client and admin console")]
struct Cli {
    /// Config file (default: ~/.config/folio/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Override the API base address
    #[arg(long, value_name = "URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in as the site admin
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the landing page summary and count the visit
    Home,
    /// Show the owner profile
    Profile,
    /// List projects
    Projects,
    /// List services
    Services,
    /// List contact messages (admin)
    Messages,
    /// Show dashboard statistics (admin)
    Stats,
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Create a project, or update it when --id is given (admin)
    ///
    /// Updates start from the stored project; only the flags given change.
    SaveProject {
        #[arg(long)]
        id: Option<String>,
        /// Required when creating
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        live_url: Option<String>,
        /// Comma-separated technology tags
        #[arg(long)]
        tech: Option<String>,
        /// Image file to upload for the project
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// Delete a project (admin)
    DeleteProject { id: String },
    /// Edit the services list (admin)
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Delete a contact message (admin)
    DeleteMessage { id: String },
    /// Upload an image and print its URL (admin)
    Upload { file: PathBuf },
    /// Show or toggle the theme preference
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug)]
enum ServiceAction {
    /// Append a service
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        price: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove the service at a position (as listed, starting at 1)
    Remove { position: usize },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeAction {
    Toggle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    folio::logging::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.api_url)?;
    let ctx = ClientContext::from_config(config)?;

    run(ctx, cli.command).await
}

fn load_config(path: Option<&Path>, api_url: Option<String>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

/// Clear the session on a rejected credential and say how to recover.
fn admin<T>(ctx: &ClientContext, result: Result<T, ClientError>) -> anyhow::Result<T> {
    ctx.check_auth(result).map_err(|err| {
        if err.is_auth() {
            eprintln!("Session expired or invalid. Run `folio login` to sign in again.");
        }
        err.into()
    })
}

async fn run(ctx: ClientContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let mut form = ctx.login_form();
            form.set("email", email);
            form.set("password", password);
            if let Err(err) = ctx.submit_login(&mut form).await {
                report_form_failure(form.state().failure(), &err);
                return Err(err.into());
            }
            println!("Signed in.");
        }

        Command::Logout => {
            ctx.logout()?;
            println!("Signed out.");
        }

        Command::Home => {
            ctx.views().increment_once().await;
            let profile = ctx.queries().profile().await?;
            println!("{}", profile.name.as_deref().unwrap_or("(no name)"));
            if let Some(headline) = &profile.headline {
                println!("{}", headline);
            }
            let projects = ctx.queries().projects().await?;
            println!("{} projects", projects.len());
        }

        Command::Profile => {
            let profile = ctx.queries().profile().await?;
            let rows = [
                ("Name", &profile.name),
                ("Headline", &profile.headline),
                ("Bio", &profile.bio),
                ("Email", &profile.email),
                ("WhatsApp", &profile.whatsapp),
                ("Resume", &profile.resume_url),
                ("GitHub", &profile.github_url),
                ("LinkedIn", &profile.linkedin_url),
                ("Twitter", &profile.twitter_url),
            ];
            for (label, value) in rows {
                if let Some(value) = value {
                    println!("{:<10} {}", label, value);
                }
            }
            if let Some(image) = &profile.image_url {
                println!("{:<10} {}", "Image", ctx.asset_url(image));
            }
        }

        Command::Projects => {
            for project in ctx.queries().projects().await? {
                println!("[{}] {}", project.id, project.title);
                if !project.tech_stack.is_empty() {
                    println!("    {}", project.tech_stack.join(", "));
                }
                if let Some(url) = project.live_url.as_deref().filter(|u| !u.is_empty()) {
                    println!("    {}", url);
                }
                if let Some(image) = project.image_url.as_deref().filter(|u| !u.is_empty()) {
                    println!("    {}", ctx.asset_url(image));
                }
            }
        }

        Command::Services => {
            for (index, service) in ctx.queries().services().await?.iter().enumerate() {
                println!("{}. {} ({})", index + 1, service.name, service.price);
                if !service.description.is_empty() {
                    println!("    {}", service.description);
                }
            }
        }

        Command::Messages => {
            let messages = admin(&ctx, ctx.queries().messages().await)?;
            let now = chrono::Utc::now();
            for message in messages {
                println!(
                    "[{}] {} <{}> {}",
                    message.id,
                    message.name,
                    message.email,
                    relative_time(message.created_at, now)
                );
                if let Some(phone) = &message.phone {
                    println!("    {}", phone);
                }
                println!("    {}", message.message);
            }
        }

        Command::Stats => {
            let (stats, counts) = admin(&ctx, ctx.queries().dashboard_counts().await)?;
            println!("Projects  {}", counts.projects);
            println!("Services  {}", counts.services);
            println!("Messages  {}", counts.messages);
            println!("Views     {}", counts.views);
            let now = chrono::Utc::now();
            for activity in &stats.recent_activities {
                println!(
                    "  {} ({})",
                    activity.action,
                    relative_time(activity.created_at, now)
                );
            }
        }

        Command::Contact {
            name,
            email,
            phone,
            message,
        } => {
            let mut form = ctx.contact_form();
            form.set("name", name);
            form.set("email", email);
            form.set("phone", phone.unwrap_or_default());
            form.set("message", message);
            if let Err(err) = ctx.submit_contact(&mut form).await {
                report_form_failure(form.state().failure(), &err);
                return Err(err.into());
            }
            println!("Message sent successfully!");
        }

        Command::SaveProject {
            id,
            title,
            description,
            live_url,
            tech,
            image,
        } => {
            let mut draft = match id {
                Some(id) => {
                    let projects = admin(&ctx, ctx.queries().projects().await)?;
                    let project = projects
                        .iter()
                        .find(|project| project.id.as_str() == id)
                        .ok_or_else(|| anyhow::anyhow!("No project with id {}", id))?;
                    ProjectDraft::from_project(project)
                }
                None if title.is_none() => {
                    anyhow::bail!("--title is required when creating a project")
                }
                None => ProjectDraft::new(),
            };
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(live_url) = live_url {
                draft.live_url = live_url;
            }
            if let Some(tech) = tech {
                draft.tech_stack = tech;
            }
            if let Some(path) = image {
                let url = upload(&ctx, &path).await?;
                draft.set_image(url);
            }
            let mutation = Mutation::save_project(&draft);
            let receipt = admin(&ctx, ctx.mutations().mutate(mutation).await)?;
            println!("Project {}d.", receipt.operation.as_str());
        }

        Command::DeleteProject { id } => {
            let mutation = Mutation::DeleteProject(EntityId::new(id.clone()));
            admin(&ctx, ctx.mutations().mutate(mutation).await)?;
            println!("Deleted project {}.", id);
        }

        Command::Service { action } => {
            let current = ctx.queries().services().await?;
            let mut draft = ServiceDraft::from_services(&current);
            match action {
                ServiceAction::Add {
                    name,
                    price,
                    description,
                } => {
                    draft.add_blank();
                    let index = draft.rows().len() - 1;
                    draft.set_field(index, ServiceField::Name, name);
                    draft.set_field(index, ServiceField::Price, price);
                    draft.set_field(index, ServiceField::Description, description);
                }
                ServiceAction::Remove { position } => {
                    if position == 0 || position > draft.rows().len() {
                        anyhow::bail!("No service at position {}", position);
                    }
                    draft.remove(position - 1);
                }
            }
            let mutation = Mutation::ReplaceServices(draft.into_rows());
            admin(&ctx, ctx.mutations().mutate(mutation).await)?;
            println!("Services updated successfully!");
        }

        Command::DeleteMessage { id } => {
            let mutation = Mutation::DeleteMessage(EntityId::new(id.clone()));
            admin(&ctx, ctx.mutations().mutate(mutation).await)?;
            println!("Deleted message {}.", id);
        }

        Command::Upload { file } => {
            let url = upload(&ctx, &file).await?;
            println!("{}", ctx.asset_url(&url));
        }

        Command::Theme { action } => {
            let theme = match action {
                Some(ThemeAction::Toggle) => ctx.theme().toggle()?,
                None => ctx.theme().current(),
            };
            println!("{}", theme.as_str());
        }
    }

    Ok(())
}

async fn upload(ctx: &ClientContext, path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    admin(ctx, ctx.upload_image(&file_name, bytes).await)
}

fn report_form_failure(failure: Option<&str>, err: &ClientError) {
    match err {
        ClientError::Validation(errors) => {
            for (field, message) in errors.iter() {
                eprintln!("{}: {}", field, message);
            }
        }
        _ => match failure {
            Some(message) => eprintln!("{}", message),
            None => eprintln!("{}", err.user_message()),
        },
    }
}
