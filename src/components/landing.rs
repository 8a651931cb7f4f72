pub fn render_landing(app_title: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", app_title));
    out.push_str("Automatisez le paiement de vos factures\n");
    out.push_str(&format!(
        "{} simplifie la gestion des factures pour les freelances et micro-entreprises en France.\n\n",
        app_title
    ));
    out.push_str("  - Gagnez du temps : uploadez vos factures et laissez-nous nous occuper du reste.\n");
    out.push_str("  - Évitez les erreurs : automatisez vos paiements et évitez les retards.\n");
    out.push_str("  - Suivez vos dépenses : gardez un œil sur votre trésorerie.\n\n");
    out.push_str("Commencer : payrush open /dashboard\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_points_to_the_dashboard() {
        let text = render_landing("PayRush");
        assert!(text.starts_with("PayRush\n"));
        assert!(text.trim_end().ends_with("payrush open /dashboard"));
    }
}
