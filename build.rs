#[cfg(target_os = "windows")]
fn main() {
    use winresource::WindowsResource;

    // The icon is optional: only embed it when res/rtareo.ico is present.
    let mut res = WindowsResource::new();
    if std::path::Path::new("res/rtareo.ico").exists() {
        res.set_icon("res/rtareo.ico");
    }
    res.set("FileDescription", "rTareo CLI")
        .set("ProductName", "rTareo")
        .set("OriginalFilename", "rtareo.exe")
        .set("FileVersion", env!("CARGO_PKG_VERSION"))
        .set("ProductVersion", env!("CARGO_PKG_VERSION"));

    if let Err(e) = res.compile() {
        println!("cargo:warning=Failed to embed Windows resources: {e}");
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {}
