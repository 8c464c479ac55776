use flamewar_game::{CardCatalog, CardCensus, Game, GameConfig, GameStatus};

fn check_census_over_seeds(config: &GameConfig, seeds: std::ops::Range<u64>) {
    let catalog = CardCatalog::load_default().expect("bundled deck loads");
    let expected = CardCensus::of_catalog(&catalog);
    for seed in seeds {
        let mut game = Game::new(&catalog, config.clone(), seed).unwrap();
        assert_eq!(game.census(), expected, "seed {seed} after the deal");
        while game.play_round().is_ok() {
            assert_eq!(game.census(), expected, "seed {seed} round {}", game.rounds());
        }
        assert!(matches!(game.status(), GameStatus::Terminated(_)));
        assert_eq!(game.census(), expected, "seed {seed} at termination");
    }
}

#[test]
fn cards_are_conserved_with_default_rules() {
    check_census_over_seeds(&GameConfig::default(), 0..60);
}

#[test]
fn cards_are_conserved_when_interrupts_fire_every_round() {
    let config = GameConfig {
        interrupt_chance: 1.0,
        ..GameConfig::default()
    };
    check_census_over_seeds(&config, 100..160);
}

#[test]
fn cards_are_conserved_at_a_small_table() {
    let config = GameConfig {
        num_players: 2,
        num_goals: 4,
        hand_size: 3,
        interrupt_chance: 0.5,
    };
    check_census_over_seeds(&config, 200..240);
}

#[test]
fn read_emails_stay_read_while_attached() {
    let catalog = CardCatalog::load_default().unwrap();
    let config = GameConfig {
        interrupt_chance: 0.0,
        ..GameConfig::default()
    };
    for seed in 0..20 {
        let mut game = Game::new(&catalog, config.clone(), seed).unwrap();
        loop {
            let read_before: Vec<(String, usize)> = game
                .table()
                .goals
                .iter()
                .map(|goal| {
                    let read = goal.emails.iter().filter(|email| email.is_read()).count();
                    (goal.flavor.clone(), read)
                })
                .collect();
            if game.play_round().is_err() {
                break;
            }
            for (flavor, read) in read_before {
                if let Some(goal) = game.table().goals.iter().find(|goal| goal.flavor == flavor) {
                    let now = goal.emails.iter().filter(|email| email.is_read()).count();
                    assert!(now >= read, "seed {seed}: {flavor:?} lost a read email");
                }
            }
        }
    }
}
