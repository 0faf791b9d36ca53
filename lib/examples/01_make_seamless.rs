use seamless_texture as st;

fn main() -> Result<(), st::Error> {
    // The key is always passed explicitly, the library never reads it from
    // the environment on its own
    let api_key = std::env::var("STABILITY_API_KEY").map_err(|_| st::Error::MissingApiKey)?;

    let session = st::Session::builder()
        // the texture must be square, with an even side length
        .load_texture(&"imgs/cobblestones.png")
        // this should be close to the prompt the texture was generated with
        .prompt("detailed seamless texture pattern")
        // keep the inpainted seams close to the original content
        .denoising_strength(0.4)
        .build()?;

    let inpainter = st::StabilityInpainter::new(api_key);
    let seamless = session.run(&inpainter, None)?;

    // also save what was sent to, and received from, the inpainter
    seamless.save_debug("out/01_debug")?;
    seamless.save("out/01.png")
}
