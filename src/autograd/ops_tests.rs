use super::*;
use crate::autograd::{clear_graph, get_grad, no_grad};

fn assert_close(actual: &[f32], expected: &[f32], tol: f32) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < tol, "index {i}: expected {e}, got {a}");
    }
}

#[test]
fn test_add_forward() {
    let a = Tensor::from_slice(&[1.0, 2.0]);
    let b = Tensor::from_slice(&[0.5, -2.0]);
    assert_eq!(a.add(&b).data(), &[1.5, 0.0]);
}

#[test]
fn test_untracked_ops_do_not_record() {
    clear_graph();
    let a = Tensor::from_slice(&[1.0, 2.0]);
    let out = a.relu().mean();
    assert!(!out.requires_grad_enabled());
    assert!(with_graph(|g| g.is_empty()));
}

#[test]
fn test_no_grad_suppresses_recording() {
    clear_graph();
    let a = Tensor::from_slice(&[1.0, 2.0]).requires_grad();
    let out = no_grad(|| a.relu().mean());
    assert!(!out.requires_grad_enabled());
    assert!(with_graph(|g| g.is_empty()));
}

#[test]
fn test_matmul_forward() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let b = Tensor::new(&[7.0, 8.0, 9.0, 10.0, 11.0, 12.0], &[3, 2]);
    let c = a.matmul(&b).expect("3-wide operands");
    assert_eq!(c.shape(), &[2, 2]);
    assert_close(c.data(), &[58.0, 64.0, 139.0, 154.0], 1e-4);
}

#[test]
#[should_panic(expected = "matmul dimension mismatch")]
fn test_matmul_mismatch_panics() {
    let a = Tensor::new(&[1.0, 2.0], &[1, 2]);
    let b = Tensor::new(&[1.0, 2.0, 3.0], &[3, 1]);
    let _ = a.matmul(&b);
}

#[test]
fn test_relu_keeps_nan() {
    let x = Tensor::from_slice(&[-1.0, f32::NAN, 0.0, 2.0]);
    let out = x.relu();
    assert_eq!(out.data()[0], 0.0);
    assert!(out.data()[1].is_nan());
    assert_eq!(out.data()[2], 0.0);
    assert_eq!(out.data()[3], 2.0);
}

#[test]
fn test_matmul_propagates_nan_through_zero_rows() {
    let a = Tensor::new(&[0.0, 0.0], &[1, 2]);
    let b = Tensor::new(&[f32::NAN, 1.0], &[2, 1]);
    let c = a.matmul(&b).expect("1x2 @ 2x1");
    assert!(c.data()[0].is_nan());
}

#[test]
fn test_sigmoid_keeps_nan() {
    let s = Tensor::from_slice(&[f32::NAN]).sigmoid();
    assert!(s.data()[0].is_nan());
}

#[test]
fn test_transpose_forward() {
    let a = Tensor::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let t = a.transpose();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.data(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
}

#[test]
fn test_broadcast_add_forward() {
    let m = Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let b = Tensor::new(&[10.0, 20.0], &[2]);
    assert_eq!(m.broadcast_add(&b).data(), &[11.0, 22.0, 13.0, 24.0]);
}

#[test]
fn test_sigmoid_stays_in_open_interval() {
    let x = Tensor::from_slice(&[-1000.0, -20.0, 0.0, 20.0, 1000.0]);
    let s = x.sigmoid();
    for &v in s.data() {
        assert!(v > 0.0 && v < 1.0, "sigmoid escaped (0, 1): {v}");
    }
    assert!((s.data()[2] - 0.5).abs() < 1e-6);
}

#[test]
fn test_linear_layer_gradients() {
    clear_graph();
    // out = mean(relu(x @ W^T + b))
    let x = Tensor::new(&[1.0, 2.0, -1.0, 0.5], &[2, 2]);
    let w = Tensor::new(&[0.5, -0.25, 1.0, 1.0], &[2, 2]).requires_grad();
    let b = Tensor::new(&[0.1, -0.1], &[2]).requires_grad();

    let out = x
        .matmul(&w.transpose())
        .expect("2x2 operands")
        .broadcast_add(&b)
        .relu()
        .mean();
    out.backward();

    // pre-activations: row0 = [0.1, 2.9], row1 = [-0.525, -0.6]
    // only row 0 is active; each active unit contributes 1/4
    let gw = get_grad(w.id()).expect("w tracked");
    assert_close(gw.data(), &[0.25, 0.5, 0.25, 0.5], 1e-5);
    let gb = get_grad(b.id()).expect("b tracked");
    assert_close(gb.data(), &[0.25, 0.25], 1e-5);
    assert!(get_grad(x.id()).is_none());
}

#[test]
fn test_sigmoid_gradient_matches_finite_difference() {
    let x0 = 0.3_f32;
    clear_graph();
    let x = Tensor::from_slice(&[x0]).requires_grad();
    x.sigmoid().mean().backward();
    let analytic = get_grad(x.id()).expect("tracked").data()[0];

    let h = 1e-3;
    let f = |v: f32| 1.0 / (1.0 + (-v).exp());
    let numeric = (f(x0 + h) - f(x0 - h)) / (2.0 * h);
    assert!((analytic - numeric).abs() < 1e-3);
}

#[test]
fn test_matmul_gradient_reaches_both_operands() {
    clear_graph();
    let a = Tensor::new(&[1.0, 2.0], &[1, 2]).requires_grad();
    let b = Tensor::new(&[3.0, 4.0], &[2, 1]).requires_grad();
    a.matmul(&b).expect("1x2 @ 2x1").mean().backward();

    assert_close(get_grad(a.id()).expect("a").data(), &[3.0, 4.0], 1e-6);
    assert_close(get_grad(b.id()).expect("b").data(), &[1.0, 2.0], 1e-6);
}
