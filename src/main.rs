use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::warn;

use travelpack::form::PackageForm;
use travelpack::{
    BackendPackageHost, DestinationId, PackageBackend, PackageEditor, PackageId, PlaceId,
    RestBackend, SubmitOutcome, TravelPackConfig, logging,
};

mod cli;

use cli::{Cli, Command, PackageFields};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TravelPackConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    let backend = RestBackend::new(&config)?;

    match cli.command {
        Command::Destinations => {
            let destinations = backend.list_destinations().await?;
            if destinations.is_empty() {
                println!("No destinations found");
            }
            for destination in destinations {
                println!("{:>6}  {}", destination.id, destination.name);
            }
        }
        Command::Places { destination } => {
            let places = backend
                .places_for_destination(DestinationId(destination))
                .await?;
            println!("Destination {} has {} places:", destination, places.len());
            for place in places {
                println!("{:>6}  {}", place.id, place.name);
            }
        }
        Command::Show { package } => {
            let package_id = PackageId(package);
            let Some(found) = backend.fetch_package(package_id).await? else {
                bail!("Package {package} not found");
            };
            print!("{found}");
            if let Some(itinerary) = backend
                .itinerary_for_package(package_id)
                .await?
                .into_iter()
                .next()
            {
                for (day, text) in itinerary.descriptions.iter().enumerate() {
                    println!("   Day {}: {}", day + 1, text);
                }
            }
        }
        Command::Create(fields) => {
            run_editor(&backend, None, &fields).await?;
        }
        Command::Edit { package, fields } => {
            let existing = backend
                .fetch_package(PackageId(package))
                .await?
                .with_context(|| format!("Package {package} not found"))?;
            run_editor(&backend, Some(existing), &fields).await?;
        }
    }

    Ok(())
}

/// Drive the editor the way the modal does: mount, pick a destination, fill
/// in fields, submit.
async fn run_editor(
    backend: &RestBackend,
    existing: Option<travelpack::Package>,
    fields: &PackageFields,
) -> Result<()> {
    let destinations = backend.list_destinations().await.unwrap_or_else(|err| {
        warn!("Failed to load destinations: {}", err);
        Vec::new()
    });

    let host = BackendPackageHost::new(backend);
    let mut editor = PackageEditor::open(backend, &host, destinations, existing);
    editor.mount().await;

    if let Some(destination) = fields.destination {
        editor
            .select_destination(Some(DestinationId(destination)))
            .await;
    }
    apply_fields(editor.form_mut(), fields);
    for place in &fields.places {
        editor.toggle_place(PlaceId(*place));
    }

    match editor.submit().await {
        SubmitOutcome::Saved(package) => {
            println!("Saved package:");
            print!("{package}");
            Ok(())
        }
        SubmitOutcome::Rejected(message) => bail!(message),
        SubmitOutcome::Ignored => bail!("Editor is not accepting submissions"),
    }
}

fn apply_fields(form: &mut PackageForm, fields: &PackageFields) {
    if let Some(title) = &fields.title {
        form.set_title(title.as_str());
    }
    if let Some(description) = &fields.description {
        form.set_description(description.as_str());
    }
    if let Some(price) = &fields.price {
        form.set_price(price.as_str());
    }
    if let Some(image_url) = &fields.image_url {
        form.set_image_url(image_url.as_str());
    }

    match &fields.duration {
        Some(duration) => form.set_duration(duration.as_str()),
        None if !form.is_editing() && !fields.days.is_empty() => {
            form.set_duration(fields.days.len().to_string());
        }
        None => {}
    }

    for (day, text) in fields.days.iter().enumerate() {
        if !form.set_day(day, text.as_str()) {
            warn!(
                "Ignoring itinerary text for day {}: package lasts {} days",
                day + 1,
                form.itinerary().len()
            );
        }
    }
}
