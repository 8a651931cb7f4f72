use crate::services::upload::{UploadSnapshot, ACCEPTED_LABEL};
use crate::utils::format_kb;

const BAR_WIDTH: usize = 20;

fn progress_bar(value: u8) -> String {
    let filled = BAR_WIDTH * value.min(100) as usize / 100;
    format!("[{}{}] {}%", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled), value)
}

pub fn render_upload_widget(widget: &UploadSnapshot, inbox: Option<&std::path::Path>) -> String {
    let mut out = String::new();
    match inbox {
        Some(folder) => out.push_str(&format!(
            "Déposez vos factures dans {}\n",
            folder.display()
        )),
        None => out.push_str("Glissez-déposez vos factures ici\n"),
    }
    out.push_str(&format!("Formats acceptés: {}\n", ACCEPTED_LABEL));

    let progress = widget.progress;
    if widget.uploading {
        out.push_str(&format!("Téléchargement... {}\n", progress_bar(progress)));
    } else if progress == 100 {
        out.push_str(&format!("{} Téléchargement terminé\n", progress_bar(progress)));
    }

    if !widget.rejections.is_empty() {
        out.push_str("Fichiers rejetés:\n");
        for rejection in &widget.rejections {
            out.push_str(&format!("  - {} - {}\n", rejection.name, rejection.reason));
        }
    }

    let files = &widget.files;
    if !files.is_empty() && !widget.uploading {
        let plural = if files.len() > 1 { "s" } else { "" };
        out.push_str(&format!(
            "{} fichier{} sélectionné{}:\n",
            files.len(),
            plural,
            plural
        ));
        for file in files {
            out.push_str(&format!("  - {} ({})\n", file.name, format_kb(file.size)));
        }
    }
    out
}
