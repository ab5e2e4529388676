use std::collections::HashMap;

/// Mean measure per group key. Key order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct GroupedResult {
    means: HashMap<String, f64>,
}

impl GroupedResult {
    pub fn new(means: HashMap<String, f64>) -> Self {
        GroupedResult { means }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.means.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.means.len()
    }

    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.means.iter().map(|(key, mean)| (key.as_str(), *mean))
    }

    /// Groups ordered by mean, highest first. Equal means are ordered by key.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|(left_key, left), (right_key, right)| {
            right.total_cmp(left).then_with(|| left_key.cmp(right_key))
        });
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// Describes the first disagreement with `other`, if any.
    ///
    /// Two means agree when they differ by at most `tolerance` relative to the
    /// larger magnitude, with magnitudes below 1.0 compared absolutely.
    pub fn difference(&self, other: &GroupedResult, tolerance: f64) -> Option<String> {
        if self.len() != other.len() {
            return Some(format!(
                "{} groups versus {} groups",
                self.len(),
                other.len()
            ));
        }
        let mut keys: Vec<&String> = self.means.keys().collect();
        keys.sort();
        for key in keys {
            let mean = self.means[key];
            match other.get(key) {
                None => return Some(format!("group '{}' is missing", key)),
                Some(other_mean) if !within_tolerance(mean, other_mean, tolerance) => {
                    return Some(format!(
                        "group '{}': {} versus {}",
                        key, mean, other_mean
                    ));
                }
                Some(_) => {}
            }
        }
        None
    }

    pub fn approx_eq(&self, other: &GroupedResult, tolerance: f64) -> bool {
        self.difference(other, tolerance).is_none()
    }
}

fn within_tolerance(left: f64, right: f64, tolerance: f64) -> bool {
    // equal infinities subtract to NaN
    if left == right {
        return true;
    }
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= tolerance * scale
}

impl FromIterator<(String, f64)> for GroupedResult {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        GroupedResult {
            means: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<(String, f64)>> for GroupedResult {
    fn from(rows: Vec<(String, f64)>) -> Self {
        rows.into_iter().collect()
    }
}
