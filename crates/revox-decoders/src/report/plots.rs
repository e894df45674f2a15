use ndarray::{Array3, Axis};
use plotly::layout::{Axis as LayoutAxis, Layout};
use plotly::{HeatMap, Histogram, Plot};

/// Plot a histogram of the decision scores for the two conditions
pub fn plot_score_histogram(
    scores: &[f32],
    targets: &[i32],
    pos_label: &str,
    neg_label: &str,
    title: &str,
) -> Result<Plot, String> {
    // Assert that the scores and targets have the same length
    assert_eq!(
        scores.len(),
        targets.len(),
        "Scores and targets must have the same length"
    );

    // Assert that the targets are only two classes
    assert!(
        targets.iter().all(|&l| l == 1 || l == -1),
        "Targets must be composed of only two classes, 1 for the positive and -1 for the negative condition"
    );

    let mut scores_pos = Vec::new();
    let mut scores_neg = Vec::new();

    for (score, target) in scores.iter().zip(targets.iter()) {
        if *target == 1 {
            scores_pos.push(*score);
        } else {
            scores_neg.push(*score);
        }
    }

    let trace_pos = Histogram::new(scores_pos).name(pos_label);
    let trace_neg = Histogram::new(scores_neg).name(neg_label);

    let layout = Layout::new()
        .title(title)
        .x_axis(LayoutAxis::new().title("Decision score"))
        .y_axis(LayoutAxis::new().title("Count"));

    let mut plot = Plot::new();
    plot.add_trace(trace_pos);
    plot.add_trace(trace_neg);
    plot.set_layout(layout);

    Ok(plot)
}

/// Render one 2D slice through a coefficient volume as a heat map.
///
/// # Arguments
///
/// * `map` - The unmasked coefficient volume
/// * `axis` - The volume axis to cut along (0, 1 or 2)
/// * `index` - The slice index along that axis
/// * `title` - The title of the plot
pub fn plot_coefficient_slice(
    map: &Array3<f32>,
    axis: usize,
    index: usize,
    title: &str,
) -> Result<Plot, String> {
    if axis > 2 {
        return Err(format!("Axis must be 0, 1 or 2, got {}", axis));
    }
    if index >= map.len_of(Axis(axis)) {
        return Err(format!(
            "Slice index {} out of bounds for axis {} of length {}",
            index,
            axis,
            map.len_of(Axis(axis))
        ));
    }

    let slice = map.index_axis(Axis(axis), index);
    let z: Vec<Vec<f64>> = slice
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|&v| v as f64).collect())
        .collect();

    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new_z(z));
    plot.set_layout(Layout::new().title(title));
    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_score_histogram_builds() {
        let scores = vec![0.9, -0.7, 0.8, -0.6];
        let targets = vec![1, -1, 1, -1];
        let plot = plot_score_histogram(&scores, &targets, "face", "house", "scores").unwrap();
        let html = plot.to_inline_html(Some("scores-div"));
        assert!(html.contains("face"));
        assert!(html.contains("house"));
    }

    #[test]
    fn test_coefficient_slice_bounds() {
        let map = Array3::<f32>::zeros((4, 5, 6));
        assert!(plot_coefficient_slice(&map, 1, 2, "cut").is_ok());
        assert!(plot_coefficient_slice(&map, 3, 0, "cut").is_err());
        assert!(plot_coefficient_slice(&map, 2, 6, "cut").is_err());
    }
}
