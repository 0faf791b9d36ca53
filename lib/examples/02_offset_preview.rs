use seamless_texture as st;

fn main() -> Result<(), st::Error> {
    // Preparing a session never touches the network, this produces the
    // offset texture with its seams in the center and the mask covering them,
    // which can be inpainted by hand in any image editor
    let session = st::Session::builder()
        .load_texture(&"imgs/cobblestones.png")
        // a wider band gives the inpainter more room to blend the seams
        .band_width(96)
        .build()?;

    let prepared = session.prepare();

    std::fs::create_dir_all("out")?;
    prepared.image.save("out/02_offset.png")?;
    prepared.mask.save("out/02_mask.png")?;

    Ok(())
}
