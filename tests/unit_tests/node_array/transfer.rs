use matrixcompare::assert_matrix_eq;
use nalgebra::{dvector, DVector, DVectorView, DVectorViewMut};
use node_field::node_array::{NodeArray, NodeSegment};
use node_field::NodeFieldError;
use num::Complex;
use util::{assert_approx_slice_eq, assert_panics, complex_pairs};

/// Three nodes with segments `a` (id 1, width 2), `b` (id 2, width 2) and `z` (id 3, width 4).
fn three_segments() -> NodeArray<f64> {
    let mut node_array = NodeArray::new(3);
    node_array
        .add_segments(vec![
            (1, NodeSegment::new(2, "a")),
            (2, NodeSegment::new(2, "b")),
            (3, NodeSegment::new(4, "z")),
        ])
        .unwrap();
    node_array
}

#[test]
fn copy_segment_to_vector_flattens_node_by_node() {
    let mut node_array = three_segments();
    let mut a = node_array.segment_mut(1).unwrap();
    for node in 0..3 {
        a.set_value(node, 0, node as f64);
        a.set_value(node, 1, -(node as f64));
    }

    let mut vector = DVector::repeat(8, 9.0);
    node_array
        .copy_segment_to_vector(1, DVectorViewMut::from(&mut vector), 1)
        .unwrap();
    assert_matrix_eq!(vector, dvector![9.0, 0.0, 0.0, 1.0, -1.0, 2.0, -2.0, 9.0], comp = exact);
}

#[test]
fn copy_vector_to_segment_overwrites_only_that_segment() {
    let mut node_array = three_segments();
    node_array.segment_mut(1).unwrap().fill(5.0);

    let vector = dvector![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    node_array
        .copy_vector_to_segment(2, DVectorView::from(&vector), 2)
        .unwrap();

    let b = node_array.segment(2).unwrap();
    assert_eq!(b.node_values(0), [1.0, 2.0]);
    assert_eq!(b.node_values(1), [3.0, 4.0]);
    assert_eq!(b.node_values(2), [5.0, 6.0]);
    assert!(node_array.segment(1).unwrap().iter_nodes().all(|v| v == [5.0, 5.0]));
    assert!(node_array.segment(3).unwrap().iter_nodes().all(|v| v == [0.0; 4]));
}

#[test]
fn add_vector_to_segment_scales_and_accumulates() {
    let mut node_array = three_segments();
    node_array.segment_mut(2).unwrap().fill(1.0);
    let vector = dvector![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];

    node_array
        .add_vector_to_segment(2, DVectorView::from(&vector), 0.5, 0)
        .unwrap();

    let mut result = DVector::<f64>::zeros(6);
    node_array
        .copy_segment_to_vector(2, DVectorViewMut::from(&mut result), 0)
        .unwrap();
    assert_matrix_eq!(result, dvector![1.5, 2.0, 2.5, 3.0, 3.5, 4.0], comp = abs, tol = 1e-14);
}

#[test]
fn add_segment_to_vector_scales_and_accumulates() {
    let mut node_array = three_segments();
    node_array.segment_mut(1).unwrap().fill(2.0);
    let mut vector = DVector::repeat(7, 1.0);

    node_array
        .add_segment_to_vector(-3.0, 1, DVectorViewMut::from(&mut vector), 1)
        .unwrap();
    assert_matrix_eq!(vector, dvector![1.0, -5.0, -5.0, -5.0, -5.0, -5.0, -5.0], comp = exact);
}

#[test]
fn transfer_with_unknown_segment_fails() {
    let mut node_array = three_segments();
    let mut vector = DVector::<f64>::zeros(6);
    assert_eq!(
        node_array.copy_segment_to_vector(4, DVectorViewMut::from(&mut vector), 0),
        Err(NodeFieldError::UnknownSegment(4))
    );
    assert_eq!(
        node_array.add_vector_to_segment(4, DVectorView::from(&vector), 1.0, 0),
        Err(NodeFieldError::UnknownSegment(4))
    );
}

#[test]
fn transfer_with_short_vector_panics() {
    assert_panics!({
        let node_array = three_segments();
        let mut vector = DVector::<f64>::zeros(6);
        let _ = node_array.copy_segment_to_vector(1, DVectorViewMut::from(&mut vector), 1);
    });
    assert_panics!({
        let mut node_array = three_segments();
        let vector = DVector::<f64>::zeros(5);
        let _ = node_array.copy_vector_to_segment(1, DVectorView::from(&vector), 0);
    });
}

#[test]
fn add_segment_to_segment_accumulates() {
    let mut node_array = three_segments();
    node_array.segment_mut(1).unwrap().fill(1.0);

    node_array.add_segment_to_segment(2, 1, 2.0).unwrap();
    assert!(node_array.segment(2).unwrap().iter_nodes().all(|v| v == [2.0, 2.0]));

    node_array.add_segment_to_segment(2, 1, 2.0).unwrap();
    assert!(node_array.segment(2).unwrap().iter_nodes().all(|v| v == [4.0, 4.0]));
    // The source is unchanged
    assert!(node_array.segment(1).unwrap().iter_nodes().all(|v| v == [1.0, 1.0]));
}

#[test]
fn add_segment_to_itself_scales_it() {
    let mut node_array = three_segments();
    node_array.segment_mut(1).unwrap().fill(3.0);
    node_array.add_segment_to_segment(1, 1, 1.0).unwrap();
    assert!(node_array.segment(1).unwrap().iter_nodes().all(|v| v == [6.0, 6.0]));
}

#[test]
fn add_segment_to_segment_requires_equal_widths() {
    let mut node_array = three_segments();
    node_array.segment_mut(3).unwrap().fill(1.0);
    let before = node_array.values().to_vec();

    assert_eq!(
        node_array.add_segment_to_segment(1, 3, 1.0),
        Err(NodeFieldError::WidthMismatch {
            expected: 2,
            actual: 4
        })
    );
    assert_eq!(
        node_array.add_segment_to_segment(1, 8, 1.0),
        Err(NodeFieldError::UnknownSegment(8))
    );
    assert_eq!(node_array.values(), before.as_slice());
}

#[test]
fn complex_vector_round_trip_through_interleaved_segment() {
    let mut node_array = three_segments();
    let z = DVector::from_fn(6, |i, _| Complex::new(i as f64, 10.0 + i as f64));

    node_array
        .add_complex_vector_to_segment(3, DVectorView::from(&z), 2.0)
        .unwrap();

    let segment = node_array.segment(3).unwrap();
    assert_approx_slice_eq!(segment.node_values(0), [0.0, 20.0, 2.0, 22.0], abstol = 1e-14);
    assert_approx_slice_eq!(segment.node_values(2), [8.0, 28.0, 10.0, 30.0], abstol = 1e-14);

    let mut per_node = [Complex::new(0.0, 0.0); 2];
    segment.get_complex_value(1, &mut per_node);
    assert_eq!(per_node.to_vec(), complex_pairs(&[4.0, 24.0, 6.0, 26.0]));

    let mut copied = DVector::from_element(6, Complex::new(0.0, 0.0));
    node_array
        .copy_segment_to_complex_vector(3, DVectorViewMut::from(&mut copied))
        .unwrap();
    let expected = z.map(|zi| zi * 2.0);
    assert_eq!(copied, expected);
}

#[test]
fn complex_transfer_requires_even_width_and_matching_length() {
    assert_panics!({
        let mut node_array = NodeArray::<f64>::new(2);
        node_array
            .add_segments(vec![(1, NodeSegment::new(3, "odd"))])
            .unwrap();
        let z = DVector::from_element(3, Complex::new(1.0, 1.0));
        let _ = node_array.add_complex_vector_to_segment(1, DVectorView::from(&z), 1.0);
    });
    assert_panics!({
        let mut node_array = three_segments();
        let z = DVector::from_element(4, Complex::new(1.0, 1.0));
        let _ = node_array.add_complex_vector_to_segment(3, DVectorView::from(&z), 1.0);
    });
}

#[test]
fn transfers_after_two_relayouts() {
    let mut node_array = NodeArray::<f64>::new(2);
    node_array
        .add_segments_with_value(vec![(1, NodeSegment::new(1, "source"))], 1.0)
        .unwrap();
    node_array
        .add_segments(vec![(2, NodeSegment::new(1, "target")), (3, NodeSegment::new(2, "phasor"))])
        .unwrap();

    node_array.add_segment_to_segment(2, 1, 2.0).unwrap();
    node_array.add_segment_to_segment(2, 1, 2.0).unwrap();
    assert_eq!(node_array.segment(2).unwrap().node_values(0), [4.0]);
    assert_eq!(node_array.segment(2).unwrap().node_values(1), [4.0]);

    let mut target = DVector::<f64>::zeros(4);
    node_array
        .copy_segment_to_vector(2, DVectorViewMut::from(&mut target), 2)
        .unwrap();
    assert_matrix_eq!(target, dvector![0.0, 0.0, 4.0, 4.0], comp = exact);

    let z = dvector![Complex::new(1.0, 2.0), Complex::new(1.0, 2.0)];
    node_array
        .add_complex_vector_to_segment(3, DVectorView::from(&z), 1.0)
        .unwrap();
    let mut per_node = [Complex::new(0.0, 0.0)];
    for node in 0..2 {
        node_array
            .segment(3)
            .unwrap()
            .get_complex_value(node, &mut per_node);
        assert_eq!(per_node, [Complex::new(1.0, 2.0)]);
    }
    assert_eq!(node_array.segment(1).unwrap().node_values(1), [1.0]);
}
