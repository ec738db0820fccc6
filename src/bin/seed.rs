use chrono::{Duration, Local};
use clap::Parser;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use class_assistant::{
    domain::{AnnouncementRecord, CreateTeacherRequest, EntryKind, Partition},
    repository::{
        AnnouncementRepository, SqliteAnnouncementRepository,
        TeacherRepository, SqliteTeacherRepository,
    },
};

/// Fill a database with a teacher account and sample announcements.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://class_assistant.db?mode=rwc")]
    database_url: String,

    #[arg(long, default_value = "1ο Δημοτικό Σχολείο")]
    school: String,

    #[arg(long, default_value = "Β1")]
    section: String,

    /// Extra randomly dated homework entries on top of the fixed samples.
    #[arg(long, default_value_t = 10)]
    count: usize,

    #[arg(long, default_value = "teacher")]
    username: String,

    #[arg(long, default_value = "password123")]
    password: String,
}

const HOMEWORK: &[(&str, &str)] = &[
    ("Μαθηματικά", "Ασκήσεις σελίδα 42"),
    ("Γλώσσα", "Ορθογραφία ενότητα 5"),
    ("Ιστορία", "Διάβασμα κεφάλαιο 3"),
    ("Μελέτη Περιβάλλοντος", "Φύλλο εργασίας για τα φυτά"),
    ("Αγγλικά", "Workbook p. 18"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Seeding {}...", args.database_url);

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&args.database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let teacher_repo = SqliteTeacherRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());

    let teacher = match teacher_repo.find_by_username(&args.username).await? {
        Some(existing) => existing,
        None => {
            let created = teacher_repo.create(CreateTeacherRequest {
                username: args.username.clone(),
                full_name: "Δασκάλα Τάξης".to_string(),
                password: args.password.clone(),
            }).await?;
            println!("  ✅ Created teacher ({} / {})", args.username, args.password);
            created
        }
    };

    let partition = Partition::new(&args.school, &args.section);
    let today = Local::now().date_naive();

    let sample = |phrase: &str, info: &str, days_ago: i64| AnnouncementRecord {
        record_id: Uuid::new_v4(),
        keyword_phrase: phrase.to_string(),
        info: info.to_string(),
        url: None,
        kind: EntryKind::Text,
        entry_date: today - Duration::days(days_ago),
        school: partition.school.clone(),
        class_section: partition.class_section.clone(),
        action_date: None,
        author_id: Some(teacher.id),
    };

    let mut records = vec![
        sample("Μαθηματικά", "Άσκηση 3 από το τετράδιο", 0),
        AnnouncementRecord {
            url: Some("https://example.org/symmetoxi.pdf".to_string()),
            kind: EntryKind::Link,
            action_date: Some(today + Duration::days(12)),
            ..sample("Εκδρομή Μουσείο", "Φύλλο συμμετοχής", 1)
        },
        AnnouncementRecord {
            action_date: Some(today + Duration::days(5)),
            ..sample("Σχολική Εκδρομή", "Αναχώρηση 8:30 από την αυλή", 2)
        },
        AnnouncementRecord {
            action_date: Some(today + Duration::days(20)),
            ..sample("Θεατρική Παράσταση", "Πρόβα την Παρασκευή", 4)
        },
    ];

    let mut rng = rand::thread_rng();
    for _ in 0..args.count {
        if let Some((phrase, info)) = HOMEWORK.choose(&mut rng) {
            records.push(sample(*phrase, *info, rng.gen_range(0..14)));
        }
    }

    println!("📣 Creating {} announcements for {}...", records.len(), partition);
    for record in records {
        announcement_repo.append(record).await?;
    }

    println!("✨ Done.");

    Ok(())
}
