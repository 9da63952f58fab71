use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use contacts_core::{
    Config, Event, EventKind, Page, PageContext, Status, WeatherReading, exerciser,
    view::{ApiForm, ContactField, FileInfo, FormInput, ResultSlot, WeatherPane, WeatherSlot, ids},
};
use inquire::Text;

use crate::terminal::{Terminal, TerminalWidget};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "contacts", version, about = "Contacts page client")]
pub struct Cli {
    /// Override the configured application origin.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the configured cookie string (e.g. "csrftoken=...; sessionid=...").
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// The six contact fields, as on the create/update forms.
#[derive(Debug, Clone, Args)]
pub struct ContactArgs {
    #[arg(long, default_value_t)]
    pub first_name: String,
    #[arg(long, default_value_t)]
    pub last_name: String,
    #[arg(long, default_value_t)]
    pub email: String,
    #[arg(long, default_value_t)]
    pub phone: String,
    #[arg(long, default_value_t)]
    pub city: String,
    /// Status id.
    #[arg(long, default_value_t)]
    pub status: String,
}

impl ContactArgs {
    fn values(&self) -> [(ContactField, &str); 6] {
        [
            (ContactField::FirstName, self.first_name.as_str()),
            (ContactField::LastName, self.last_name.as_str()),
            (ContactField::Email, self.email.as_str()),
            (ContactField::Phone, self.phone.as_str()),
            (ContactField::City, self.city.as_str()),
            (ContactField::Status, self.status.as_str()),
        ]
    }

    fn fill_form(&self, term: &mut Terminal, form: ApiForm) {
        for (field, value) in self.values() {
            term.set_input(form, FormInput::Field(field), value.to_string());
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the application origin and session cookies.
    Configure {
        #[arg(long = "url")]
        url: Option<String>,
        #[arg(long = "cookies")]
        cookies: Option<String>,
    },

    #[command(flatten)]
    Page(PageCommand),
}

/// Commands that run against one page of the application.
#[derive(Debug, Subcommand)]
pub enum PageCommand {
    /// List the available contact statuses.
    Statuses,

    /// List all contacts.
    List,

    /// Show one contact.
    Show { id: String },

    /// Create a contact.
    Create {
        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Replace a contact's fields.
    Update {
        id: String,
        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Delete a contact after confirmation.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },

    /// Check contact fields the way the contact form does, without sending them.
    Validate {
        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Show current weather for one or more cities.
    Weather {
        #[arg(required = true)]
        cities: Vec<String>,
    },

    /// Check a file the way the CSV import form does.
    CheckUpload { path: PathBuf },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { base_url, cookie, command } = self;

        match command {
            Command::Configure { url, cookies } => configure(url, cookies),
            Command::Page(command) => {
                let config = load_config(base_url, cookie)?;
                let mut page = Page::new(PageContext::from_config(&config));
                command.run(&mut page).await
            }
        }
    }
}

fn load_config(base_url: Option<String>, cookie: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(url) = base_url {
        config.set_base_url(&url)?;
    }
    if cookie.is_some() {
        config.cookies = cookie;
    }
    Ok(config)
}

impl PageCommand {
    async fn run(self, page: &mut Page<Terminal>) -> anyhow::Result<()> {
        match self {
            PageCommand::Statuses => {
                let statuses = page
                    .context()
                    .api()
                    .statuses()
                    .await
                    .context("Failed to load statuses")?;
                for line in status_lines(&statuses) {
                    println!("{line}");
                }
            }
            PageCommand::List => {
                let mut term = Terminal::new(false);
                let mut click = Event::new(EventKind::Click, ids::BTN_GET_CONTACTS);
                page.dispatch(&mut term, &mut click).await;
                term.print_slot(ResultSlot::ContactsList);
            }
            PageCommand::Show { id } => {
                let mut term = Terminal::new(false);
                exerciser::show_contact(page.context().api(), &mut term, &id).await;
                term.print_slot(ResultSlot::ContactsList);
            }
            PageCommand::Create { contact } => {
                let mut term = Terminal::new(false);
                contact.fill_form(&mut term, ApiForm::Create);
                page.submit(&mut term, ApiForm::Create).await;
                term.print_slot(ResultSlot::Create);
            }
            PageCommand::Update { id, contact } => {
                let mut term = Terminal::new(false);
                contact.fill_form(&mut term, ApiForm::Update);
                term.set_input(ApiForm::Update, FormInput::ContactId, id);
                page.submit(&mut term, ApiForm::Update).await;
                term.print_slot(ResultSlot::Update);
            }
            PageCommand::Delete { id, yes } => {
                let mut term = Terminal::new(yes);
                term.set_input(ApiForm::Delete, FormInput::ContactId, id);
                page.submit(&mut term, ApiForm::Delete).await;
                term.print_slot(ResultSlot::Delete);
            }
            PageCommand::Validate { contact } => validate(page, &contact).await?,
            PageCommand::Weather { cities } => weather(page, cities).await,
            PageCommand::CheckUpload { path } => check_upload(page, &path).await?,
        }

        Ok(())
    }
}

fn status_lines(statuses: &[Status]) -> Vec<String> {
    statuses.iter().map(|status| format!("{:>4}  {}", status.id, status.name)).collect()
}

fn configure(url: Option<String>, cookies: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = match url {
        Some(url) => url,
        None => Text::new("Application URL:")
            .with_default(&config.base_url)
            .prompt()
            .context("Failed to read application URL")?,
    };
    config.set_base_url(&url)?;

    let cookies = match cookies {
        Some(cookies) => cookies,
        None => Text::new("Cookies (as sent by the browser, may be empty):")
            .with_default(config.cookies())
            .prompt()
            .context("Failed to read cookies")?,
    };
    config.cookies = Some(cookies).filter(|c| !c.trim().is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn validate(page: &mut Page<Terminal>, contact: &ContactArgs) -> anyhow::Result<()> {
    let mut term = Terminal::new(false);
    for (field, value) in contact.values() {
        term.set_field(field, value.to_string());
    }

    let mut submit = Event::new(EventKind::Submit, ids::CONTACT_FORM);
    page.dispatch(&mut term, &mut submit).await;

    for (field, state) in &term.states {
        println!("{:<11} {}", field.label(), state.class());
    }

    match term.revealed {
        Some(field) if submit.default_prevented() => {
            Err(anyhow!("Contact form blocked; first invalid field: {}", field.label()))
        }
        _ => Ok(()),
    }
}

async fn weather(page: &mut Page<Terminal>, cities: Vec<String>) {
    let mut term = Terminal::new(false);
    term.widgets = cities.into_iter().map(TerminalWidget::new).collect();

    let loader = page.context().weather();
    loader.load_all(&mut term.widgets).await;

    for widget in &term.widgets {
        if widget.pane != WeatherPane::Info {
            println!("{}: weather not available", widget.city);
            continue;
        }

        let reading = loader.cache().get(&widget.city).and_then(WeatherReading::from_payload);
        let unit = |pick: fn(&WeatherReading) -> Option<&str>| {
            with_space(reading.as_ref().and_then(pick).unwrap_or_default())
        };

        println!(
            "{}: {}{}, humidity {}{}, wind {}{}",
            widget.city,
            widget.text(WeatherSlot::Temperature),
            unit(|r| r.temperature_unit.as_deref()),
            widget.text(WeatherSlot::Humidity),
            unit(|r| r.humidity_unit.as_deref()),
            widget.text(WeatherSlot::WindSpeed),
            unit(|r| r.wind_speed_unit.as_deref()),
        );
    }
}

fn with_space(unit: &str) -> String {
    if unit.is_empty() { String::new() } else { format!(" {unit}") }
}

async fn check_upload(page: &mut Page<Terminal>, path: &Path) -> anyhow::Result<()> {
    let mut term = Terminal::new(false);
    term.file = fs::metadata(path).ok().filter(|meta| meta.is_file()).map(|meta| FileInfo {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: meta.len(),
    });

    let mut submit = Event::new(EventKind::Submit, ids::CSV_FORM);
    page.dispatch(&mut term, &mut submit).await;

    if submit.default_prevented() {
        return Err(anyhow!("Upload rejected: {}", path.display()));
    }

    println!("{} can be uploaded", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delete_accepts_yes_flag() {
        let cli = Cli::parse_from(["contacts", "delete", "12", "--yes"]);
        assert!(matches!(
            cli.command,
            Command::Page(PageCommand::Delete { ref id, yes: true }) if id == "12"
        ));
    }

    #[test]
    fn empty_status_list_prints_nothing() {
        assert!(status_lines(&[]).is_empty());

        let status = Status { id: 3, name: "lost".into(), description: None };
        assert_eq!(status_lines(&[status]), vec!["   3  lost"]);
    }

    #[tokio::test]
    async fn unreachable_server_fails_statuses() {
        let config = Config { base_url: "http://127.0.0.1:9".into(), ..Config::default() };
        let mut page = Page::new(PageContext::from_config(&config));

        let err = PageCommand::Statuses.run(&mut page).await.unwrap_err();

        assert!(err.to_string().contains("Failed to load statuses"));
    }

    #[test]
    fn contact_fields_default_to_empty() {
        let cli = Cli::parse_from(["contacts", "create", "--first-name", "Jan", "--status", "2"]);
        let Command::Page(PageCommand::Create { contact }) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(contact.first_name, "Jan");
        assert_eq!(contact.city, "");
        assert_eq!(contact.status, "2");
    }
}
