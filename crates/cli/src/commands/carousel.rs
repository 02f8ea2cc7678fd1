//! Carousel demo command.

use std::time::Duration;

use clap::Args;
use mochileros_storefront::carousel::{CarouselController, GroupSpec, Slide, SlideDisplay};
use mochileros_storefront::state::SiteState;

use super::CommandError;

/// Carousel demo options.
#[derive(Debug, Args)]
pub struct CarouselArgs {
    /// Slide as `title|price|url`; later parts may be omitted
    #[arg(long = "slide", required = true)]
    slides: Vec<String>,

    /// Number of automatic advances to watch
    #[arg(long, default_value_t = 3)]
    rotations: usize,

    /// Time between advances in milliseconds (overrides `CAROUSEL_INTERVAL_MS`)
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn parse_slide(raw: &str) -> Slide {
    let mut parts = raw.split('|').map(str::trim);
    let mut slide = Slide::new();
    if let Some(title) = parts.next().filter(|s| !s.is_empty()) {
        slide = slide.with_title(title);
    }
    if let Some(price) = parts.next().filter(|s| !s.is_empty()) {
        slide = slide.with_price(price);
    }
    if let Some(url) = parts.next().filter(|s| !s.is_empty()) {
        slide = slide.with_target(url);
    }
    slide
}

/// Run one group and log each change until `rotations` advances happened.
pub async fn run(state: &SiteState, args: CarouselArgs) -> Result<(), CommandError> {
    let spec = GroupSpec {
        slides: args.slides.iter().map(|s| parse_slide(s)).collect(),
        display: SlideDisplay::default(),
    };

    let controller = match args.interval_ms {
        Some(0) => {
            return Err(CommandError::InvalidArgument(
                "interval-ms",
                "must be greater than zero".to_string(),
            ));
        }
        Some(ms) => CarouselController::initialize_all(vec![spec], Duration::from_millis(ms)),
        None => state.initialize_carousels(vec![spec]),
    };
    let Some(handle) = controller.get(0) else {
        return Err(CommandError::InvalidArgument("slide", "no slides".to_string()));
    };

    let mut views = handle.subscribe();
    {
        let view = views.borrow_and_update();
        tracing::info!(active = view.active, price = %view.display.price, "{}", view.display.title);
    }
    for _ in 0..args.rotations {
        if views.changed().await.is_err() {
            break;
        }
        let view = views.borrow_and_update().clone();
        tracing::info!(active = view.active, price = %view.display.price, "{}", view.display.title);
    }

    controller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slide() {
        let slide = parse_slide("Roma | desde 399 € | pack-roma.html");
        assert_eq!(slide.title.as_deref(), Some("Roma"));
        assert_eq!(slide.price_label.as_deref(), Some("desde 399 €"));
        assert_eq!(slide.target_url.as_deref(), Some("pack-roma.html"));

        let bare = parse_slide("Lisboa");
        assert_eq!(bare.price_label, None);
        assert_eq!(bare.call_to_action, None);
    }
}
