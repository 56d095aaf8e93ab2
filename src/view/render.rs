//! 终端文本渲染

use std::fmt::Write;

use super::{ExplorationView, Mode};
use crate::models::{Algorithm, RecommendationItem};
use crate::services::PAGE_SIZE;

const RULE: &str = "------------------------------------------------------------";

/// 将视图渲染为一帧文本
pub fn render(view: &ExplorationView) -> String {
    let mut out = String::new();

    if view.mode() == Mode::Browsing && !view.prompt_dismissed() {
        render_hero(&mut out);
        return out;
    }

    render_search(&mut out, view);
    render_chips(&mut out, view.session().algorithm());

    match view.mode() {
        Mode::Browsing => {
            let _ = writeln!(out, "Type a game title to find similar games.");
        }
        Mode::Exploring => render_results(&mut out, view),
        Mode::Detail => {
            render_results(&mut out, view);
            render_overlay(&mut out, view);
        }
    }
    out
}

fn render_hero(out: &mut String) {
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "   S T E A M   S E A R C H");
    let _ = writeln!(out, "   Find games like the ones you already love.");
    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "   [enter] Press enter to continue");
}

fn render_search(out: &mut String, view: &ExplorationView) {
    let _ = writeln!(out, "Search: {}", view.search().query());
    for (i, game) in view.search().candidates().iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {}", i + 1, game.name);
    }
}

fn render_chips(out: &mut String, active: Algorithm) {
    let chips: Vec<String> = Algorithm::ALL
        .iter()
        .map(|algorithm| {
            if *algorithm == active {
                format!("[{}]", algorithm.label())
            } else {
                format!(" {} ", algorithm.label())
            }
        })
        .collect();
    let _ = writeln!(out, "Algorithm: {}", chips.join(" "));
}

fn render_results(out: &mut String, view: &ExplorationView) {
    let session = view.session();
    let Some(selected) = session.selected() else {
        return;
    };

    let _ = writeln!(out, "{}", RULE);
    let _ = writeln!(out, "Games similar to {}", selected.name);

    if session.is_loading() {
        let _ = writeln!(out, "Loading...");
    }
    if let Some(elapsed_ms) = session.elapsed_ms() {
        let _ = writeln!(
            out,
            "{} results in {} ms",
            session.recommendations().len(),
            elapsed_ms
        );
    }

    for (i, item) in session.current_page().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, card_line(item));
    }

    if session.page_count() > 0 {
        let _ = writeln!(
            out,
            "Page {} / {}   ({} per page)",
            session.page(),
            session.page_count(),
            PAGE_SIZE
        );
    }
}

fn card_line(item: &RecommendationItem) -> String {
    let mut line = format!("{:<40} score {:.2}", item.game.name, item.features().score);
    match item.price {
        Some(price) if price > 0.0 => {
            let _ = write!(line, "  ${:.2}", price);
        }
        Some(_) => line.push_str("  Free"),
        None => {}
    }
    line
}

fn render_overlay(out: &mut String, view: &ExplorationView) {
    let (Some(selected), Some(candidate)) = (view.session().selected(), view.detail()) else {
        return;
    };

    let _ = writeln!(out, "+{}", RULE);
    let _ = writeln!(out, "| {} vs {}", selected.name, candidate.game.name);
    if !candidate.game.image_url.is_empty() {
        let _ = writeln!(out, "| {}", candidate.game.image_url);
    }
    for visualization in view.visualizations() {
        for line in visualization.render().lines() {
            let _ = writeln!(out, "| {}", line);
        }
    }
    let _ = writeln!(out, "+{}  [/close]", RULE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Game;
    use crate::observability::ClientMetrics;
    use crate::services::{RecommendResponse, SearchResponse};
    use crate::view::keyboard::KeyboardHub;
    use crate::view::{Completion, Fetch, UiEvent};

    fn exploring_view(hub: &KeyboardHub<UiEvent>) -> ExplorationView {
        let mut view = ExplorationView::new(hub, ClientMetrics::default());
        if let Some(Fetch::Search(request)) = view.handle(UiEvent::QueryChanged("Half".into())) {
            view.complete(Completion::Search(SearchResponse {
                seq: request.seq,
                query: request.query,
                outcome: Ok(vec![Game::new(220, "Half-Life 2", "")]),
            }));
        }
        if let Some(Fetch::Recommend(request)) = view.handle(UiEvent::CandidateChosen(0)) {
            let mut portal = RecommendationItem::new(Game::new(400, "Portal", "portal.jpg"));
            portal.price = Some(9.99);
            portal.game.features.score = 0.87;
            let mut free = RecommendationItem::new(Game::new(440, "Team Fortress 2", ""));
            free.price = Some(0.0);
            view.complete(Completion::Recommend(RecommendResponse {
                seq: request.seq,
                game_id: request.game_id,
                algorithm: request.algorithm,
                started: request.started,
                outcome: Ok(vec![portal, free]),
            }));
        }
        view
    }

    #[test]
    fn test_hero_until_continue() {
        let hub = KeyboardHub::new();
        let mut view = ExplorationView::new(&hub, ClientMetrics::default());
        assert!(render(&view).contains("Press enter to continue"));

        view.handle(UiEvent::ContinuePrompt);
        let frame = render(&view);
        assert!(frame.contains("Search: "));
        assert!(frame.contains("[Default]"));
    }

    #[test]
    fn test_results_frame() {
        let hub = KeyboardHub::new();
        let view = exploring_view(&hub);
        let frame = render(&view);

        assert!(frame.contains("Games similar to Half-Life 2"));
        assert!(frame.contains("2 results in"));
        assert!(frame.contains("1. Portal"));
        assert!(frame.contains("score 0.87  $9.99"));
        assert!(frame.contains("Free"));
        assert!(frame.contains("Page 1 / 1"));
    }

    #[test]
    fn test_overlay_frame() {
        let hub = KeyboardHub::new();
        let mut view = exploring_view(&hub);
        view.handle(UiEvent::CardChosen(0));

        let frame = render(&view);
        assert!(frame.contains("| Half-Life 2 vs Portal"));
        assert!(frame.contains("| portal.jpg"));
        assert!(frame.contains("Jaccard"));
        assert!(frame.contains("angle 29.5°"));
        assert!(frame.contains("matching positions 0 / 150"));
    }
}
