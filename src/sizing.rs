use crate::model::Assignments;
use tracing::debug;

/// Partition a lab's population into team sizes close to `base`. Whole teams
/// of `base` students are formed first, the remainder is spread one student
/// at a time over the leading teams, and any team still larger than
/// `split_threshold` is split into two halves in a single pass (the halves
/// themselves are never re-split). A population smaller than `base` yields no
/// teams at all.
pub fn team_sizes(population: usize, base: usize, split_threshold: usize) -> Vec<usize> {
    let teams = population / base;
    if teams == 0 {
        return Vec::new();
    }
    let mut sizes = vec![base; teams];
    let remaining = population - teams * base;
    for size in &mut sizes {
        *size += remaining / teams;
    }
    for size in &mut sizes[..remaining % teams] {
        *size += 1;
    }
    for idx in 0..teams {
        let size = sizes[idx];
        if size > split_threshold {
            sizes[idx] = size / 2;
            sizes.push(size / 2 + size % 2);
        }
    }
    sizes
}

/// Team size sequences for every lab, indexed by `LabId`.
pub fn lab_team_sizes(a: &Assignments, base: usize, split_threshold: usize) -> Vec<Vec<usize>> {
    a.labs
        .iter()
        .map(|lab| {
            let sizes = team_sizes(lab.population, base, split_threshold);
            debug!("lab {}: {} students in teams {:?}", lab.code, lab.population, sizes);
            sizes
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_spreads_over_leading_teams() {
        // 23 students, base 5: four teams, three of them one student over.
        assert_eq!(team_sizes(23, 5, 6), vec![6, 6, 6, 5]);
    }

    #[test]
    fn oversized_teams_are_split_once() {
        // 13 students, base 6: [7, 6], then 7 splits into 3 + 4.
        assert_eq!(team_sizes(13, 6, 6), vec![3, 6, 4]);
        // A single team of 8 splits into two even halves.
        assert_eq!(team_sizes(8, 8, 6), vec![4, 4]);
    }

    #[test]
    fn population_below_base_yields_no_teams() {
        assert_eq!(team_sizes(3, 5, 6), Vec::<usize>::new());
    }

    #[test]
    fn sizes_always_sum_to_population() {
        for population in 5..60 {
            for base in 3..7 {
                let sizes = team_sizes(population, base, 6);
                if population >= base {
                    assert_eq!(sizes.iter().sum::<usize>(), population);
                    assert!(sizes.iter().all(|&s| s <= 6), "{sizes:?}");
                }
            }
        }
    }
}
