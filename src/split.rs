//! Стратифицированное разбиение на train/test

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{PrepError, Result};
use crate::types::Dataset;

#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
}

/// Размеры train/test: `floor(train_size * n)` и остаток
pub fn split_sizes(n_samples: usize, train_size: f64) -> Result<(usize, usize)> {
    if !(train_size > 0.0 && train_size < 1.0) {
        return Err(PrepError::InvalidTrainSize(train_size));
    }

    let n_train = (train_size * n_samples as f64).floor() as usize;
    let n_test = n_samples - n_train;

    if n_train == 0 || n_test == 0 {
        return Err(PrepError::Stratification(format!(
            "with {} samples and train size {} one of the subsets would be empty",
            n_samples, train_size
        )));
    }
    Ok((n_train, n_test))
}

/// Распределение `n_draws` по классам пропорционально `class_counts`.
///
/// Берется целая часть доли каждого класса, недостающие элементы
/// отдаются классам с наибольшим дробным остатком; при равных остатках
/// выбор случайный.
pub fn approximate_mode<R: Rng + ?Sized>(
    class_counts: &[usize],
    n_draws: usize,
    rng: &mut R,
) -> Vec<usize> {
    let total: usize = class_counts.iter().sum();
    if total == 0 {
        return vec![0; class_counts.len()];
    }

    let continuous: Vec<f64> = class_counts
        .iter()
        .map(|&c| c as f64 * n_draws as f64 / total as f64)
        .collect();
    let mut floored: Vec<usize> = continuous.iter().map(|c| c.floor() as usize).collect();
    let mut need_to_add = n_draws.saturating_sub(floored.iter().sum());

    if need_to_add > 0 {
        let remainder: Vec<f64> = continuous
            .iter()
            .zip(&floored)
            .map(|(c, &f)| c - f as f64)
            .collect();

        let mut values = remainder.clone();
        values.sort_by(|a, b| b.total_cmp(a));
        values.dedup();

        for value in values {
            let candidates: Vec<usize> = remainder
                .iter()
                .enumerate()
                .filter(|&(_, &r)| r == value)
                .map(|(i, _)| i)
                .collect();
            let add_now = candidates.len().min(need_to_add);
            for &i in candidates.choose_multiple(rng, add_now) {
                floored[i] += 1;
            }
            need_to_add -= add_now;
            if need_to_add == 0 {
                break;
            }
        }
    }

    floored
}

/// Позиции строк train/test для заданных меток.
///
/// Каждая позиция попадает ровно в одно подмножество.
pub fn stratified_indices<R: Rng + ?Sized>(
    labels: &[String],
    train_size: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let (n_train, n_test) = split_sizes(labels.len(), train_size)?;

    // Классы в отсортированном порядке, позиции внутри класса — в исходном
    let mut classes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (pos, label) in labels.iter().enumerate() {
        classes.entry(label.as_str()).or_default().push(pos);
    }

    if let Some((label, members)) = classes.iter().find(|(_, m)| m.len() < 2) {
        return Err(PrepError::Stratification(format!(
            "class '{}' has only {} member, at least 2 are required",
            label,
            members.len()
        )));
    }

    let n_classes = classes.len();
    if n_train < n_classes {
        return Err(PrepError::Stratification(format!(
            "train size {} is smaller than the number of classes {}",
            n_train, n_classes
        )));
    }
    if n_test < n_classes {
        return Err(PrepError::Stratification(format!(
            "test size {} is smaller than the number of classes {}",
            n_test, n_classes
        )));
    }

    let class_counts: Vec<usize> = classes.values().map(Vec::len).collect();
    let train_counts = approximate_mode(&class_counts, n_train, rng);
    let remaining: Vec<usize> = class_counts
        .iter()
        .zip(&train_counts)
        .map(|(c, t)| c - t)
        .collect();
    let test_counts = approximate_mode(&remaining, n_test, rng);

    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for (((label, members), &n_i), &t_i) in classes
        .iter_mut()
        .zip(&train_counts)
        .zip(&test_counts)
    {
        tracing::debug!("class '{}': {} train, {} test", label, n_i, t_i);
        members.shuffle(rng);
        train.extend_from_slice(&members[..n_i]);
        test.extend_from_slice(&members[n_i..n_i + t_i]);
    }

    train.shuffle(rng);
    test.shuffle(rng);

    Ok((train, test))
}

/// Разбиение датасета со стратификацией по колонке `stratify_by`.
///
/// Генератор передается явно: одинаковые данные и одинаковое состояние
/// генератора дают одинаковое разбиение.
pub fn stratified_split<R: Rng + ?Sized>(
    dataset: &Dataset,
    train_size: f64,
    stratify_by: &str,
    rng: &mut R,
) -> Result<TrainTestSplit> {
    let labels = dataset.label_keys(stratify_by)?;
    let (train_pos, test_pos) = stratified_indices(&labels, train_size, rng)?;

    let split = TrainTestSplit {
        train: dataset.take(&train_pos),
        test: dataset.take(&test_pos),
    };

    tracing::info!(
        "Split {} rows into {} train / {} test (stratified by '{}')",
        dataset.n_rows(),
        split.train.n_rows(),
        split.test.n_rows(),
        stratify_by
    );
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn labels(classes: &[(&str, usize)]) -> Vec<String> {
        classes.iter()
            .flat_map(|(label, n)| std::iter::repeat(label.to_string()).take(*n))
            .collect()
    }

    fn dataset(labels: Vec<String>) -> Dataset {
        let n = labels.len();
        Dataset::new(vec![
            Column::text("class", labels),
            Column::numeric("x", (0..n).map(|i| i as f64).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_split_sizes() {
        assert_eq!(split_sizes(10, 0.7).unwrap(), (7, 3));
        assert_eq!(split_sizes(569, 0.7).unwrap(), (398, 171));
        assert!(split_sizes(1, 0.7).is_err());
        assert!(matches!(split_sizes(10, 1.0), Err(PrepError::InvalidTrainSize(_))));
    }

    #[test]
    fn test_approximate_mode_sums_to_draws() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(approximate_mode(&[4, 6], 7, &mut rng), vec![3, 4]);
        assert_eq!(approximate_mode(&[1, 2], 3, &mut rng), vec![1, 2]);

        // Равные остатки: один из двух классов получает лишний элемент
        let counts = approximate_mode(&[5, 5], 5, &mut rng);
        assert_eq!(counts.iter().sum::<usize>(), 5);
        assert!(counts.iter().all(|&c| c == 2 || c == 3));
    }

    #[test]
    fn test_disjoint_and_exhaustive() {
        let labels = labels(&[("Malignant", 212), ("Benign", 357)]);
        let mut rng = StdRng::seed_from_u64(522);
        let (train, test) = stratified_indices(&labels, 0.7, &mut rng).unwrap();

        assert_eq!(train.len(), 398);
        assert_eq!(test.len(), 171);

        let train_set: HashSet<_> = train.iter().copied().collect();
        let test_set: HashSet<_> = test.iter().copied().collect();
        assert_eq!(train_set.len(), train.len());
        assert!(train_set.is_disjoint(&test_set));

        let all: HashSet<_> = train_set.union(&test_set).copied().collect();
        assert_eq!(all, (0..labels.len()).collect());
    }

    #[test]
    fn test_proportions_preserved() {
        let ds = dataset(labels(&[("Malignant", 212), ("Benign", 357)]));
        let mut rng = StdRng::seed_from_u64(522);
        let split = stratified_split(&ds, 0.7, "class", &mut rng).unwrap();

        let full = 212.0 / 569.0;
        for part in [&split.train, &split.test] {
            let counts = part.value_counts("class").unwrap();
            let share = counts["Malignant"] as f64 / part.n_rows() as f64;
            assert!((share - full).abs() < 0.01, "share {share} vs {full}");
        }
    }

    #[test]
    fn test_ten_row_scenario() {
        let ds = dataset(labels(&[("Malignant", 6), ("Benign", 4)]));
        let mut rng = StdRng::seed_from_u64(522);
        let split = stratified_split(&ds, 0.7, "class", &mut rng).unwrap();

        assert_eq!(split.train.n_rows(), 7);
        assert_eq!(split.test.n_rows(), 3);

        let train = split.train.value_counts("class").unwrap();
        let test = split.test.value_counts("class").unwrap();
        assert_eq!(train["Malignant"], 4);
        assert_eq!(train["Benign"], 3);
        assert_eq!(test["Malignant"], 2);
        assert_eq!(test["Benign"], 1);
    }

    #[test]
    fn test_same_seed_same_split() {
        let ds = dataset(labels(&[("Malignant", 30), ("Benign", 50)]));

        let a = stratified_split(&ds, 0.7, "class", &mut StdRng::seed_from_u64(522)).unwrap();
        let b = stratified_split(&ds, 0.7, "class", &mut StdRng::seed_from_u64(522)).unwrap();
        assert_eq!(a.train.index(), b.train.index());
        assert_eq!(a.test.index(), b.test.index());

        let c = stratified_split(&ds, 0.7, "class", &mut StdRng::seed_from_u64(7)).unwrap();
        assert_ne!(a.train.index(), c.train.index());
    }

    #[test]
    fn test_rows_stay_intact() {
        let ds = dataset(labels(&[("Malignant", 6), ("Benign", 4)]));
        let mut rng = StdRng::seed_from_u64(1);
        let split = stratified_split(&ds, 0.7, "class", &mut rng).unwrap();

        // x == исходный номер строки, значит строка перенесена целиком
        let x = split.train.numeric_matrix(&["x".to_string()]).unwrap();
        for (i, &label) in split.train.index().iter().enumerate() {
            assert_eq!(x[[i, 0]], label as f64);
        }
    }

    #[test]
    fn test_singleton_class_rejected() {
        let ds = dataset(labels(&[("Malignant", 6), ("Benign", 3), ("Unknown", 1)]));
        let mut rng = StdRng::seed_from_u64(522);
        let err = stratified_split(&ds, 0.7, "class", &mut rng).unwrap_err();
        assert!(matches!(err, PrepError::Stratification(_)));
    }

    #[test]
    fn test_too_many_classes_for_test_set() {
        let ds = dataset(labels(&[("a", 2), ("b", 2), ("c", 2)]));
        let mut rng = StdRng::seed_from_u64(522);
        // n_test = 6 - 4 = 2 < 3 классов
        let err = stratified_split(&ds, 0.7, "class", &mut rng).unwrap_err();
        assert!(matches!(err, PrepError::Stratification(_)));
    }

    #[test]
    fn test_unknown_stratify_column() {
        let ds = dataset(labels(&[("a", 5), ("b", 5)]));
        let mut rng = StdRng::seed_from_u64(522);
        let err = stratified_split(&ds, 0.7, "label", &mut rng).unwrap_err();
        assert!(matches!(err, PrepError::MissingColumn(_)));
    }
}
