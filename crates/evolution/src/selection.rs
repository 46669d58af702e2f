//! Tournament selection.

use helixflow_core::Genome;
use rand::seq::index;
use rand::Rng;

/// Draw `n` tournament winners from `population`.
///
/// Each tournament samples `k` genomes, without replacement unless the
/// population is smaller than `k`, and keeps the fittest. Ties go to the
/// first genome sampled at the maximum.
pub fn tournament_select<'a, R: Rng + ?Sized>(
    population: &'a [Genome],
    k: usize,
    n: usize,
    rng: &mut R,
) -> Vec<&'a Genome> {
    if population.is_empty() {
        return Vec::new();
    }
    let k = k.max(1);

    (0..n)
        .map(|_| {
            let contenders: Vec<usize> = if population.len() < k {
                (0..k).map(|_| rng.gen_range(0..population.len())).collect()
            } else {
                index::sample(rng, population.len(), k).into_vec()
            };
            tournament_winner(population, &contenders)
        })
        .collect()
}

fn tournament_winner<'a>(population: &'a [Genome], contenders: &[usize]) -> &'a Genome {
    let mut best = &population[contenders[0]];
    for &idx in &contenders[1..] {
        if population[idx].fitness > best.fitness {
            best = &population[idx];
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use helixflow_core::GenomeId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn ladder(fitnesses: &[f64]) -> Vec<Genome> {
        fitnesses
            .iter()
            .map(|&f| {
                let mut g = Genome::new(0, Vec::new(), Vec::new());
                g.fitness = f;
                g
            })
            .collect()
    }

    #[test]
    fn test_fittest_genome_wins_most_tournaments() {
        let population = ladder(&[0.1, 0.3, 0.5, 0.7, 0.9]);
        let mut rng = StdRng::seed_from_u64(2024);

        let mut wins: HashMap<GenomeId, usize> = HashMap::new();
        for winner in tournament_select(&population, 3, 1000, &mut rng) {
            *wins.entry(winner.id).or_default() += 1;
        }

        let best = wins[&population[4].id];
        for genome in &population[..4] {
            let other = wins.get(&genome.id).copied().unwrap_or(0);
            assert!(best > other, "best won {best}, {} won {other}", genome.fitness);
        }
        // Expected share for the fittest with k=3 of 5 without replacement is 60%.
        assert!(best > 500 && best < 700, "best won {best}");
    }

    #[test]
    fn test_small_population_samples_with_replacement() {
        let population = ladder(&[0.2, 0.4]);
        let mut rng = StdRng::seed_from_u64(1);
        let winners = tournament_select(&population, 5, 50, &mut rng);
        assert_eq!(winners.len(), 50);
    }

    #[test]
    fn test_full_tournament_always_picks_best() {
        let population = ladder(&[0.3, 0.9, 0.1, 0.5]);
        let mut rng = StdRng::seed_from_u64(3);
        for winner in tournament_select(&population, 4, 20, &mut rng) {
            assert_eq!(winner.id, population[1].id);
        }
    }

    #[test]
    fn test_tie_goes_to_first_sampled() {
        let population = ladder(&[0.5, 0.5]);
        let contenders = [1, 0];
        assert_eq!(tournament_winner(&population, &contenders).id, population[1].id);
    }

    #[test]
    fn test_empty_population_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(tournament_select(&[], 3, 10, &mut rng).is_empty());
    }
}
