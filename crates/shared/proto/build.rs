fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Identity authority; the server half backs in-process fakes in tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/auth.proto"], &["proto/"])?;

    Ok(())
}
