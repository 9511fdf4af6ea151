use crossterm::style::Color;
use rand::Rng;

use crate::config::GameConfig;
use crate::snake::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodWeight {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl FoodWeight {
    pub const ALL: [FoodWeight; 5] = [
        FoodWeight::One,
        FoodWeight::Two,
        FoodWeight::Three,
        FoodWeight::Four,
        FoodWeight::Five,
    ];

    /// Points added to the score when eaten.
    pub fn value(self) -> i32 {
        match self {
            FoodWeight::One => 1,
            FoodWeight::Two => 2,
            FoodWeight::Three => 3,
            FoodWeight::Four => 4,
            FoodWeight::Five => 5,
        }
    }

    pub fn color(self) -> Color {
        match self {
            FoodWeight::One => Color::Rgb { r: 255, g: 215, b: 0 },
            FoodWeight::Two => Color::Rgb { r: 255, g: 140, b: 0 },
            FoodWeight::Three => Color::Rgb { r: 255, g: 0, b: 0 },
            FoodWeight::Four => Color::Rgb { r: 138, g: 43, b: 226 },
            FoodWeight::Five => Color::Rgb { r: 75, g: 0, b: 130 },
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Food {
    pub position: Point,
    pub weight: FoodWeight,
}

impl Food {
    /// Picks a cell away from the outer row and column at the low edge.
    /// The snake's current cells are not excluded.
    pub fn spawn<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let origin = config.lattice_origin();
        let col = rng.gen_range(1..=(config.columns() - 1).max(1));
        let row = rng.gen_range(1..=(config.rows() - 1).max(1));

        Food {
            position: Point::new(col * config.cell + origin.x, row * config.cell + origin.y),
            weight: FoodWeight::random(rng),
        }
    }

    pub fn color(&self) -> Color {
        self.weight.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn weights_cover_one_to_five() {
        let values: Vec<i32> = FoodWeight::ALL.iter().map(|w| w.value()).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn every_weight_has_its_own_color() {
        for (i, a) in FoodWeight::ALL.iter().enumerate() {
            for b in &FoodWeight::ALL[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
        }
    }

    #[test]
    fn start_snake_can_reach_the_food() {
        let config = GameConfig::default();
        let head = config.start_body[0];
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..50 {
            let food = Food::spawn(&config, &mut rng);
            assert_eq!((food.position.x - head.x).rem_euclid(config.cell), 0);
            assert_eq!((food.position.y - head.y).rem_euclid(config.cell), 0);
            assert_eq!(food.position.y % config.cell, 10);
        }
    }

    proptest! {
        #[test]
        fn food_lands_inside_on_the_snake_lattice(seed in any::<u64>()) {
            let config = GameConfig::default();
            let origin = config.lattice_origin();
            let mut rng = StdRng::seed_from_u64(seed);
            let food = Food::spawn(&config, &mut rng);

            prop_assert!(config.in_bounds(food.position));
            prop_assert!(food.position.x >= config.cell);
            prop_assert!(food.position.y >= config.cell);
            prop_assert_eq!((food.position.x - origin.x) % config.cell, 0);
            prop_assert_eq!((food.position.y - origin.y) % config.cell, 0);
            prop_assert!((1..=5).contains(&food.weight.value()));
        }
    }
}
