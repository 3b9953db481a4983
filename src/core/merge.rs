// Partial update rules.
//
// A supplied value overwrites the current one, an absent value keeps it.
// Numeric fields additionally treat values that are not strictly positive as
// "no change", so a distance or speed can never be reset to zero by an update.

pub fn replace_if_present<T>(current: &mut T, incoming: Option<T>) {
    if let Some(value) = incoming {
        *current = value;
    }
}

pub fn replace_if_positive(current: &mut f64, incoming: Option<f64>) {
    if let Some(value) = incoming.filter(|value| *value > 0.0) {
        *current = value;
    }
}
