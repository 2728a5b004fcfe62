use actix_web::HttpResponse;
use mime_guess::from_path;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static"]
struct Assets;

pub fn serve_static(path: &str) -> HttpResponse {
    let file_path = match path {
        "/" | "/index.html" => "index.html",
        _ => path.trim_start_matches('/'),
    };

    match Assets::get(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.data.to_vec())
        }
        None => HttpResponse::NotFound().body("Not found"),
    }
}
