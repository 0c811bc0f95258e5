pub mod analytics;
pub mod cli;
pub mod loader;
pub mod media;
pub mod models;
pub mod player;
pub mod render;
pub mod settings;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio::sync::broadcast::error::RecvError;

use analytics::{AnalyticsSink, HttpAnalytics, NoopAnalytics};
use cli::{Cli, Command};
use loader::{LoadOutcome, TimelineLoader};
use media::HeadlessMedia;
use models::PresentationBundle;
use player::{PlayerController, PlayerEvent, PlayerTiming};
use render::{render_slide, PresentationStyle};
use settings::{PlayerSettings, SettingsStore};

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let store = SettingsStore::new(cli.config.clone().unwrap_or_else(SettingsStore::default_path))?;
    let mut settings = store.player()?;
    if let Some(api_base) = &cli.api_base {
        settings.api_base_url = api_base.clone();
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Command::Watch {
            slug,
            html,
            click_cta,
            no_analytics,
        } => runtime.block_on(watch(settings, &slug, html, click_cta, no_analytics)),
        Command::Inspect { slug, html } => runtime.block_on(inspect(settings, &slug, html)),
        Command::Config {
            heartbeat_secs,
            slide_poll_ms,
            save,
        } => {
            if let Some(secs) = heartbeat_secs {
                settings.heartbeat_secs = secs;
            }
            if let Some(ms) = slide_poll_ms {
                settings.slide_poll_ms = ms;
            }
            if save || heartbeat_secs.is_some() || slide_poll_ms.is_some() {
                store.update_player(settings.clone())?;
                info!("settings saved to {}", store.path().display());
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

async fn load_or_report(loader: &TimelineLoader, slug: &str) -> Option<PresentationBundle> {
    match loader.load(slug).await {
        LoadOutcome::Available(bundle) => Some(bundle),
        LoadOutcome::NotAvailable(_) => {
            println!("Presentation not available.");
            None
        }
    }
}

async fn watch(
    settings: PlayerSettings,
    slug: &str,
    html: bool,
    click_cta: bool,
    no_analytics: bool,
) -> Result<()> {
    let loader = TimelineLoader::new(settings.clone())?;
    let Some(bundle) = load_or_report(&loader, slug).await else {
        return Ok(());
    };

    let analytics: Arc<dyn AnalyticsSink> = if no_analytics {
        Arc::new(NoopAnalytics)
    } else {
        // Shares the loader's cookie store with the presentation request.
        Arc::new(HttpAnalytics::new(
            loader.client().clone(),
            settings.analytics_url(),
        ))
    };

    let style = PresentationStyle::from_bundle(&bundle);
    let controller = PlayerController::new(
        bundle,
        Arc::new(HeadlessMedia::new()),
        analytics,
        PlayerTiming::from(&settings),
    );
    let mut events = controller.subscribe();
    controller.start().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PlayerEvent::ModuleStarted { index, name, kind, .. }) => {
                    println!("== module {} '{}' ({})", index + 1, name, kind.as_str());
                }
                Ok(PlayerEvent::SlideChanged { slide: Some(slide), .. }) => {
                    let rendered = render_slide(&slide, &style);
                    if html {
                        println!("{}", rendered.to_html());
                    } else {
                        println!("-- [{}] {}", rendered.layout.as_str(), rendered.plain_text());
                    }
                }
                Ok(PlayerEvent::SlideChanged { slide: None, .. }) => {}
                Ok(PlayerEvent::CtaShown { elapsed_secs }) => {
                    let campaign = &controller.bundle().campaign;
                    println!(
                        ">> {} ({}s)",
                        campaign.cta_text.as_deref().unwrap_or("Call to action"),
                        elapsed_secs
                    );
                    if click_cta {
                        let target = controller.click_cta().await?;
                        if let Some(url) = target.url {
                            println!(">> opening {url}");
                        }
                    }
                }
                Ok(PlayerEvent::TimelineFinished { .. }) => break,
                Err(RecvError::Lagged(skipped)) => warn!("missed {skipped} player events"),
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => {
                info!("interrupted");
                break;
            }
        }
    }

    let snapshot = controller.get_snapshot().await;
    controller.stop().await;
    println!(
        "watched {}s, reached module {}",
        snapshot.state.elapsed_secs(),
        snapshot.state.module_index + 1
    );
    Ok(())
}

async fn inspect(settings: PlayerSettings, slug: &str, html: bool) -> Result<()> {
    let loader = TimelineLoader::new(settings)?;
    let Some(bundle) = load_or_report(&loader, slug).await else {
        return Ok(());
    };

    let style = PresentationStyle::from_bundle(&bundle);
    println!(
        "campaign {} '{}' theme={} fonts={} cta={}",
        bundle.campaign.id,
        bundle.campaign.slug,
        style.theme.name,
        style.fonts.preset,
        bundle
            .cta_threshold_secs()
            .map_or_else(|| "never".to_string(), |secs| format!("{secs}s")),
    );

    for (index, module) in bundle.timeline.modules().iter().enumerate() {
        println!(
            "{}. {} [{}] {} {}",
            index + 1,
            module.name,
            module.media_kind().as_str(),
            module.variant.media_url().unwrap_or("<no media>"),
            module
                .variant
                .duration
                .map_or_else(String::new, |secs| format!("{secs}s")),
        );
        for slide in &module.slides {
            let rendered = render_slide(slide, &style);
            if html {
                println!("   {:>7}ms {}", slide.start_time_ms, rendered.to_html());
            } else {
                println!(
                    "   {:>7}ms [{}] {}",
                    slide.start_time_ms,
                    rendered.layout.as_str(),
                    rendered.plain_text().replace('\n', " / ")
                );
            }
        }
    }
    Ok(())
}
