use wgpu::naga;

fn validate_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| err.emit_to_string(source))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );

    validator
        .validate(&module)
        .map_err(|err| err.emit_to_string(source))?;
    Ok(module)
}

fn entry_points(module: &naga::Module) -> Vec<&str> {
    module.entry_points.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn mesh_shader_is_valid_wgsl() {
    let module = validate_wgsl(include_str!("../src/shaders/mesh.wgsl")).unwrap();
    let names = entry_points(&module);
    for expected in ["vs_main", "fs_lambert", "fs_basic"] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
}

#[test]
fn line_shader_is_valid_wgsl() {
    let module = validate_wgsl(include_str!("../src/shaders/line.wgsl")).unwrap();
    assert_eq!(entry_points(&module), vec!["vs_main", "fs_main"]);
}
