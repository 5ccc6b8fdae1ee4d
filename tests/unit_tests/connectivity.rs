use node_field::connectivity::{ElementArray, ElementArrayBuf, ElementSegmentConnectivity, MAX_NODES_PER_ELEMENT};
use util::assert_panics;

#[test]
fn element_array_exposes_segment_connectivity() {
    let mut elements = ElementArrayBuf::new(2);
    let quads = elements.add_segment(ElementSegmentConnectivity::from_flat(
        "quad4",
        4,
        vec![0, 1, 4, 3, 1, 2, 5, 4],
    ));
    let centers = elements.add_segment(ElementSegmentConnectivity::from_flat("center", 1, vec![6, 7]));

    assert_eq!(elements.num_elements(), 2);
    assert_eq!(elements.segment_ids().collect::<Vec<_>>(), vec![quads, centers]);
    assert!(elements.is_segment_id(quads));
    assert!(!elements.is_segment_id(centers + 1));

    assert_eq!(elements.element_nodes(quads, 1), Some([1, 2, 5, 4].as_slice()));
    assert_eq!(elements.element_nodes(centers, 0), Some([6].as_slice()));
    assert_eq!(elements.element_nodes(quads, 2), None);
    assert_eq!(elements.element_nodes(centers + 1, 0), None);

    let segment = elements.segment(quads).unwrap();
    assert_eq!(segment.name(), "quad4");
    assert_eq!(segment.nodes_per_element(), 4);
    assert_eq!(segment.num_elements(), 2);
}

#[test]
fn invalid_connectivity_panics() {
    assert_panics!(ElementSegmentConnectivity::from_flat("ragged", 3, vec![0, 1, 2, 3]));
    assert_panics!(ElementSegmentConnectivity::from_flat("empty", 0, vec![]));
    assert_panics!(ElementSegmentConnectivity::from_flat(
        "huge",
        MAX_NODES_PER_ELEMENT + 1,
        vec![0; MAX_NODES_PER_ELEMENT + 1]
    ));
    assert_panics!({
        let mut elements = ElementArrayBuf::new(3);
        elements.add_segment(ElementSegmentConnectivity::from_flat("too few", 2, vec![0, 1, 1, 2]))
    });
}
