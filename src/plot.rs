use std::path::Path;

use num_complex::Complex;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, AxisConstrain, AxisType};
use plotly::{Layout, Plot, Scatter};

use crate::ber::{theoretical_ber, BerCurve};
use crate::constellation::Constellation;
use crate::sample::IqFloat;

/// Plot measured BER curves on a log axis and write them as HTML
///
/// Zero-error points are left out since they have no position on a log scale.
/// When `with_theory` is set each curve gets a dashed reference line from
/// [`theoretical_ber`] over the same SNR points.
pub fn plot_ber_curves(curves: &[BerCurve], with_theory: bool, path: impl AsRef<Path>) {
    let mut plot = Plot::new();

    for curve in curves {
        let (snr, ber): (Vec<f64>, Vec<f64>) = curve
            .points
            .iter()
            .filter(|p| p.ber > 0.0)
            .map(|p| (p.snr_db, p.ber))
            .unzip();

        let trace = Scatter::new(snr, ber)
            .mode(Mode::LinesMarkers)
            .name(curve.mod_type.label());
        plot.add_trace(trace);

        if with_theory {
            let snr = curve.snr_db();
            let reference: Vec<f64> = snr.iter().map(|&s| theoretical_ber(curve.mod_type, s)).collect();
            let trace = Scatter::new(snr, reference)
                .mode(Mode::Lines)
                .line(Line::new().dash(DashType::Dash))
                .name(&format!("{} (theory)", curve.mod_type.label()));
            plot.add_trace(trace);
        }
    }

    let layout = Layout::new()
        .title("Bit error rate over AWGN")
        .x_axis(Axis::new().title("SNR (dB)"))
        .y_axis(Axis::new().title("BER").type_(AxisType::Log))
        .auto_size(true);
    plot.set_layout(layout);

    plot.write_html(path);
}

/// Plot the ideal constellation, optionally with received symbols, as HTML
pub fn plot_constellation<T: IqFloat>(
    constellation: &Constellation<T>,
    received: Option<&[Complex<T>]>,
    path: impl AsRef<Path>,
) {
    let mut plot = Plot::new();

    if let Some(received) = received {
        let i_vals: Vec<f64> = received.iter().map(|s| s.re.as_f64()).collect();
        let q_vals: Vec<f64> = received.iter().map(|s| s.im.as_f64()).collect();
        let trace = Scatter::new(i_vals, q_vals)
            .mode(Mode::Markers)
            .name("Received");
        plot.add_trace(trace);
    }

    let i_vals: Vec<f64> = constellation.points().iter().map(|s| s.re.as_f64()).collect();
    let q_vals: Vec<f64> = constellation.points().iter().map(|s| s.im.as_f64()).collect();
    let labels: Vec<String> = constellation
        .bit_patterns()
        .iter()
        .map(|bits| bits.iter().map(|b| char::from(b'0' + b)).collect())
        .collect();
    let trace = Scatter::new(i_vals, q_vals)
        .mode(Mode::MarkersText)
        .text_array(labels)
        .name("Ideal");
    plot.add_trace(trace);

    // Equal aspect ratio so the grid is square
    let layout = Layout::new()
        .title(format!("{} constellation", constellation.mod_type().label()).as_str())
        .x_axis(Axis::new().title("In-Phase (I)"))
        .y_axis(
            Axis::new()
                .title("Quadrature (Q)")
                .scale_anchor("x")
                .constrain(AxisConstrain::Domain),
        )
        .auto_size(true);
    plot.set_layout(layout);

    plot.write_html(path);
}
