use super::*;

#[test]
fn cube_lights_exactly_its_edges() {
    let mut f = Frame::empty();
    Sprite::from(Cube::new(8)).render(&mut f);
    // 12 edges of 8 LEDs, each of the 8 corners shared by three edges.
    assert_eq!(f.lit_count(), 12 * 8 - 8 * 2);
    assert_eq!(f.get(7, 7, 7), 255);
    assert_eq!(f.get(0, 0, 0), 255);
    assert_eq!(f.get(3, 3, 3), 0);
    assert_eq!(f.get(0, 3, 3), 0);
}

#[test]
fn small_cubes_are_solid_and_positioned_by_xyz() {
    let mut f = Frame::empty();
    let mut cube = Cube::new(2);
    cube.pos = [5, 1, 0];
    Sprite::Cube(cube).render(&mut f);
    assert_eq!(f.lit_count(), 8);
    assert_eq!(f.get(0, 1, 5), 255);
    assert_eq!(f.get(1, 2, 6), 255);
}

#[test]
fn solid_cube_clips_to_grid() {
    let mut f = Frame::empty();
    let mut s = SolidCube::new([8, 8, 8]);
    s.pos = [-6, 0, 4];
    Sprite::SolidCube(s).render(&mut f);
    // x in 0..2, y in 0..8, z in 4..8
    assert_eq!(f.lit_count(), 2 * 8 * 4);
    assert_eq!(f.get(4, 7, 1), 255);
    assert_eq!(f.get(3, 0, 0), 0);
}

#[test]
fn sphere_max_merges_instead_of_overwriting() {
    let mut f = Frame::filled(200);
    let mut s = Sphere::new([4.0, 4.0, 4.0], 0.5);
    s.radius = 2.0;
    Sprite::Sphere(s).render(&mut f);
    // Nothing gets dimmer.
    assert!(f.as_bytes().iter().all(|&v| v >= 200));
    assert!(f.as_bytes().iter().any(|&v| v == 255 || v > 200));
}

#[test]
fn sphere_shell_is_brightest_near_radius() {
    let mut f = Frame::empty();
    let mut s = Sphere::new([4.0, 4.0, 4.0], 1.0);
    s.radius = (0.5f64 * 0.5 * 3.0).sqrt();
    Sprite::Sphere(s).render(&mut f);
    // The 8 cells around the centre are exactly on the shell.
    assert_eq!(f.get(3, 3, 3), 255);
    assert_eq!(f.get(4, 4, 4), 255);
    assert_eq!(f.get(0, 0, 0), 0);
}

#[test]
fn custom_voxels_are_clipped() {
    let mut f = Frame::empty();
    let sprite = Sprite::Custom(Custom {
        voxels: vec![([0, 0, 0], 10), ([9, 0, 0], 20), ([1, 2, 3], 30)],
    });
    sprite.render(&mut f);
    assert_eq!(f.lit_count(), 2);
    assert_eq!(f.get(3, 2, 1), 30);
}

#[test]
fn set_pos_moves_anchor() {
    let mut s = Sprite::from(Cube::new(1));
    s.set_pos([1, 2, 3]);
    let mut f = Frame::empty();
    s.render(&mut f);
    assert_eq!(f.get(3, 2, 1), 255);
}
