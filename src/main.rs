use std::env;

use vitality::core::world::{ActionIntent, Game, Snapshot};
use vitality::data::trackers::{load_tracker_catalog, TrackerCatalog, TrackerDefinition};

const DEFAULT_CATALOG_PATH: &str = "./assets/data/trackers.json";

fn main() {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());
    let catalog = load_catalog(&path);

    let mut game = Game::new();
    let mut ids = Vec::new();
    for definition in &catalog.trackers {
        let uid = game.spawn_tracker(definition.config());
        println!("Spawned {} as entity {}.", definition.id, uid);
        ids.push(uid);
    }

    if let Some(&first) = ids.first() {
        if let Some(signals) = game.signals_mut(first) {
            signals.death.subscribe(|vitals| {
                println!(
                    "[signal] entity down at {:.1} / {:.1}",
                    vitals.current, vitals.max
                );
            });
            signals.resurrect.subscribe(|vitals| {
                println!(
                    "[signal] entity back up at {:.1} / {:.1}",
                    vitals.current, vitals.max
                );
            });
        }
    }

    println!("\n-- Volley: 35 damage to everything active --");
    let volley = area_damage(&game, 35.0);
    report(&game.tick(volley));

    println!("\n-- Second volley --");
    let volley = area_damage(&game, 35.0);
    report(&game.tick(volley));

    if let Some(&first) = ids.first() {
        println!("\n-- Resurrect entity {} --", first);
        report(&game.tick(vec![ActionIntent::Resurrect { entity_id: first }]));

        println!("\n-- Destroy entity {} --", first);
        report(&game.tick(vec![ActionIntent::Destroy { entity_id: first }]));
    }

    println!("\n{} tracker(s) still active.", game.active_count());
}

fn area_damage(game: &Game, amount: f32) -> Vec<ActionIntent> {
    game.active_ids()
        .into_iter()
        .map(|entity_id| ActionIntent::Damage { entity_id, amount })
        .collect()
}

fn load_catalog(path: &str) -> TrackerCatalog {
    match load_tracker_catalog(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Failed to load tracker catalog from {}: {}", path, err);
            fallback_catalog()
        }
    }
}

fn fallback_catalog() -> TrackerCatalog {
    let roster = [
        ("training_dummy", 30.0, false),
        ("street_thug", 40.0, true),
        ("lieutenant", 60.0, false),
    ];

    TrackerCatalog {
        schema_version: 1,
        trackers: roster
            .into_iter()
            .map(|(id, max_health, deactivate_on_death)| TrackerDefinition {
                id: id.to_string(),
                max_health,
                damage_multiplier: 1.0,
                reset_on_enable: true,
                deactivate_on_death,
            })
            .collect(),
    }
}

fn report(snapshot: &Snapshot) {
    for line in &snapshot.events {
        println!("  {}", line);
    }
    for tracker in &snapshot.active {
        println!(
            "  entity {}: {:.1} / {:.1} ({:.0}%){}",
            tracker.id,
            tracker.health,
            tracker.max_health,
            tracker.normalized * 100.0,
            if tracker.alive { "" } else { " [dead]" }
        );
    }
}
