use xform_math::{Matrix4, Vector3, Vector4};

/// Reference values computed independently in double precision.
const FIXTURE_CLIP: [f32; 4] = [1.960_169, 1.676_309, 4.710_224, 6.597_150];

#[rustfmt::skip]
const FIXTURE_VP: [f32; 16] = [
    3.430_296, -0.538_813_7, -0.373_912_5, -0.366_508_3,
    0.0, 3.472_355, -0.373_912_5, -0.366_508_3,
    -1.470_127, -1.257_232, -0.872_462_6, -0.855_186_1,
    0.0, 0.0, 6.330_511, 8.185_353,
];

fn fixture_camera() -> (Matrix4, Matrix4) {
    let mut view = Matrix4::new();
    view.set_look_at(Vector3::new(3.0, 3.0, 7.0), Vector3::ZERO, Vector3::Y)
        .unwrap();
    let mut projection = Matrix4::new();
    projection.set_perspective(30.0, 1.0, 1.0, 100.0).unwrap();
    (view, projection)
}

fn assert_close(actual: Vector4, expected: [f32; 4], tolerance: f32) {
    for (i, (a, e)) in actual.to_array().iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "component {i}: got {a}, expected {e} (all: {actual:?})"
        );
    }
}

#[test]
fn canonical_mvp_fixture() {
    let (view, projection) = fixture_camera();
    let model = Matrix4::new();

    let mut mvp = Matrix4::new();
    mvp.set(&projection).multiply(&view).multiply(&model);

    let clip = mvp.multiply_vector4(Vector4::new(1.0, 1.0, 1.0, 1.0));
    assert_close(clip, FIXTURE_CLIP, 1e-4);
}

#[test]
fn perspective_then_look_at_matches_set_multiply_chain() {
    // The lighting demos build the view-projection in one matrix.
    let (view, projection) = fixture_camera();

    let mut vp = Matrix4::new();
    vp.set_perspective(30.0, 1.0, 1.0, 100.0)
        .unwrap()
        .look_at(Vector3::new(3.0, 3.0, 7.0), Vector3::ZERO, Vector3::Y)
        .unwrap();

    let mut chained = Matrix4::new();
    chained.set(&projection).multiply(&view);

    assert!(vp.abs_diff_eq(&chained, 1e-6));
    assert!(vp.abs_diff_eq(&Matrix4::from_cols_array(FIXTURE_VP), 1e-4));
}

#[test]
fn model_is_applied_before_view_and_projection() {
    let (view, projection) = fixture_camera();
    let model = Matrix4::from_translation(0.75, 0.0, 0.0);

    let mut mvp = Matrix4::new();
    mvp.set(&projection).multiply(&view).multiply(&model);

    let v = Vector4::new(-0.5, 0.25, 0.1, 1.0);
    let stepwise = projection.multiply_vector4(view.multiply_vector4(model.multiply_vector4(v)));
    assert_close(mvp.multiply_vector4(v), stepwise.to_array(), 1e-4);
}

#[test]
fn view_space_point_lies_in_front_of_camera() {
    let (view, _) = fixture_camera();
    let eye_space = view.multiply_vector4(Vector4::new(1.0, 1.0, 1.0, 1.0));
    assert_close(eye_space, [0.525_225_7, 0.449_165_8, -6.597_150, 1.0], 1e-4);
}

#[test]
fn clip_point_is_inside_frustum() {
    let (view, projection) = fixture_camera();
    let clip = (projection * view) * Vector4::new(1.0, 1.0, 1.0, 1.0);
    for c in [clip.x, clip.y, clip.z] {
        assert!(c.abs() <= clip.w);
    }
}
