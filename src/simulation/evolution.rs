//! Generational genetic algorithm.
//!
//! Once every vehicle of a generation has died the population is ranked by
//! fitness and replaced: the elites survive unchanged, everyone else is bred
//! from the top half by single-point crossover and per-gene mutation.

use rand::Rng;
use tracing::debug;

use super::brain::Brain;
use super::error::{Result, SimError};
use super::params::Params;
use super::track::StartPose;
use super::vehicle::Vehicle;

/// Child genome `a[..cut] ++ b[cut..]`.
///
/// Both parents must have the same length; `cut` is clamped to it.
pub fn crossover(a: &[f32], b: &[f32], cut: usize) -> Vec<f32> {
    debug_assert_eq!(a.len(), b.len());
    let cut = cut.min(a.len());
    a[..cut].iter().chain(&b[cut..]).copied().collect()
}

/// Adds a uniform offset in `[-scale, scale)` to each gene with probability `rate`.
pub fn mutate<R: Rng + ?Sized>(genes: &mut [f32], rate: f32, scale: f32, rng: &mut R) {
    for gene in genes.iter_mut() {
        if rng.random::<f32>() < rate {
            *gene += rng.random_range(-scale..scale);
        }
    }
}

/// Sorts vehicles by fitness, best first. Equal fitness keeps the original order.
pub fn rank(population: &mut [Vehicle]) {
    population.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
}

/// Breeds the next generation from a finished one.
///
/// `population` is ranked in place. The returned vehicles are numbered from
/// zero, belong to `generation + 1` and all spawn at `start`.
///
/// # Errors
///
/// [`SimError::EmptyPopulation`] when fewer than two vehicles are available to
/// select from.
pub fn next_generation<R: Rng + ?Sized>(
    population: &mut [Vehicle],
    generation: u32,
    start: StartPose,
    params: &Params,
    rng: &mut R,
) -> Result<Vec<Vehicle>> {
    if population.len() < 2 {
        return Err(SimError::EmptyPopulation {
            size: population.len(),
        });
    }

    rank(population);

    let child_generation = generation + 1;
    let target = params.population_size;
    let mut next = Vec::with_capacity(target);

    for elite in population.iter().take(params.elite_count.min(target)) {
        next.push(Vehicle::new(
            next.len(),
            elite.brain.clone(),
            child_generation,
            start,
            params,
        ));
    }

    let layout = population[0].brain.layout();
    let pool = population.len() / 2;
    let mut crossovers = 0_usize;

    while next.len() < target {
        let parent_a = &population[rng.random_range(0..pool)].brain;
        let parent_b = &population[rng.random_range(0..pool)].brain;

        let mut genes = if rng.random::<f32>() < params.crossover_rate {
            let genome_a = parent_a.genome();
            let cut = rng.random_range(0..genome_a.len());
            crossovers += 1;
            crossover(&genome_a, &parent_b.genome(), cut)
        } else {
            parent_a.genome()
        };
        mutate(&mut genes, params.mutation_rate, params.mutation_scale, rng);

        let brain = Brain::from_genome(layout, &genes)?;
        next.push(Vehicle::new(next.len(), brain, child_generation, start, params));
    }

    debug!(
        generation = child_generation,
        size = next.len(),
        crossovers,
        "bred next generation"
    );

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::brain::BrainLayout;
    use crate::simulation::track::Track;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn population_with_fitness(fitness: &[f32], params: &Params) -> Vec<Vehicle> {
        let mut rng = StdRng::seed_from_u64(1);
        let track = Track::default_circuit(params).unwrap();
        let layout = BrainLayout::new(params.brain_inputs(), params.hidden_size);
        fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let brain = Brain::new_random(layout, params.weight_scale, &mut rng);
                let mut v = Vehicle::new(i, brain, 3, track.start(), params);
                v.progress.fitness = f;
                v
            })
            .collect()
    }

    #[test]
    fn test_crossover_takes_prefix_and_suffix() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        assert_eq!(crossover(&a, &b, 0), b.to_vec());
        assert_eq!(crossover(&a, &b, 2), vec![1.0, 2.0, 7.0, 8.0]);
        assert_eq!(crossover(&a, &b, 9), a.to_vec());
    }

    #[test]
    fn test_mutation_rate_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut genes = vec![0.5; 64];
        mutate(&mut genes, 0.0, 2.0, &mut rng);
        assert!(genes.iter().all(|&g| g == 0.5));

        mutate(&mut genes, 1.0, 2.0, &mut rng);
        assert!(genes.iter().all(|&g| g != 0.5 && (-1.5..2.5).contains(&g)));
    }

    #[test]
    fn test_rank_is_stable() {
        let params = Params::default();
        let mut population = population_with_fitness(&[0.5, 2.0, 0.5, 1.0], &params);
        rank(&mut population);
        let ids: Vec<usize> = population.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_next_generation_keeps_elites() {
        let params = Params {
            population_size: 6,
            ..Params::default()
        };
        let mut population =
            population_with_fitness(&[0.1, 3.0, 0.2, 5.0, 0.3, 0.4], &params);
        let best = population[3].brain.genome();
        let second = population[1].brain.genome();
        let start = Track::default_circuit(&params).unwrap().start();

        let mut rng = StdRng::seed_from_u64(9);
        let next = next_generation(&mut population, 3, start, &params, &mut rng).unwrap();

        assert_eq!(next.len(), 6);
        assert_eq!(next[0].brain.genome(), best);
        assert_eq!(next[1].brain.genome(), second);
        assert!(next.iter().all(|v| v.generation == 4 && v.is_alive()));
        assert!(next.iter().enumerate().all(|(i, v)| v.id == i));
        assert!(next.iter().all(|v| v.fitness() == 0.0));
    }

    #[test]
    fn test_single_vehicle_cannot_breed() {
        let params = Params::default();
        let mut population = population_with_fitness(&[1.0], &params);
        let start = Track::default_circuit(&params).unwrap().start();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            next_generation(&mut population, 0, start, &params, &mut rng),
            Err(SimError::EmptyPopulation { size: 1 })
        ));
    }

    proptest! {
        #[test]
        fn prop_crossover_is_prefix_then_suffix(
            pair in (1usize..64).prop_flat_map(|len| (
                prop::collection::vec(-2.0f32..2.0, len),
                prop::collection::vec(-2.0f32..2.0, len),
                0..len,
            ))
        ) {
            let (a, b, cut) = pair;
            let child = crossover(&a, &b, cut);
            prop_assert_eq!(child.len(), a.len());
            prop_assert_eq!(&child[..cut], &a[..cut]);
            prop_assert_eq!(&child[cut..], &b[cut..]);
        }
    }
}
