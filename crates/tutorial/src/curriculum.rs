//! The scripted lessons: four levels, their steps, and the files each level
//! drops into the tree when it begins.

use shared::domain::{FileType, LevelId, Node, NodeId, DESKTOP_ID, PROJECTS_ID};

use crate::{LevelConfig, LevelStep, Observation};

pub const LEVEL_2_SEED_SENTINEL: NodeId = NodeId(201);
pub const LEVEL_3_SEED_SENTINEL: NodeId = NodeId(301);
pub const LEVEL_4_SEED_SENTINEL: NodeId = NodeId(401);

pub fn curriculum() -> Vec<LevelConfig> {
    vec![basics(), extensions(), search(), compression_and_security()]
}

fn basics() -> LevelConfig {
    LevelConfig {
        id: LevelId(1),
        title: "The Basics",
        description: "Learn to create, rename, and delete folders, your digital drawers.",
        steps: vec![
            LevelStep {
                instruction: "Welcome to your Virtual Desktop! Your first task is to create a new folder to store your pictures.",
                knowledge_drop: "Think of a Folder as a digital box or drawer where you keep related files together to stay organized.",
                pro_tip: Some("Right-click on the empty space and select \"New Folder\"."),
                action_prompt: Some("Great start! Now let's give it a proper name."),
                is_complete: |obs| {
                    obs.desktop_has("New Folder") || obs.desktop_has("Photos")
                },
            },
            LevelStep {
                instruction: "Rename the folder you created to \"Photos\".",
                knowledge_drop: "Giving folders clear names helps you find things quickly later. \"New Folder\" is too vague!",
                pro_tip: Some("Select the folder and press F2, or Right-click > Rename."),
                action_prompt: Some("Looking good. But wait, I changed my mind..."),
                is_complete: |obs| obs.desktop_has("Photos"),
            },
            LevelStep {
                instruction: "Rename the \"Photos\" folder to \"My Memories\".",
                knowledge_drop: "You can rename a folder as many times as you like. It does not change the files inside it.",
                pro_tip: None,
                action_prompt: Some("Perfect. Now let's learn how to clean up."),
                is_complete: |obs| obs.desktop_has("My Memories") && !obs.desktop_has("Photos"),
            },
            LevelStep {
                instruction: "Delete the \"My Memories\" folder.",
                knowledge_drop: "Deleting removes the folder from your immediate workspace, but it is not gone forever yet!",
                pro_tip: Some("Select the folder and press the \"Delete\" key on your keyboard."),
                action_prompt: Some("Oops! We might need that back. Let's recover it."),
                is_complete: |obs| obs.trash_has("My Memories") && !obs.desktop_has("My Memories"),
            },
            LevelStep {
                instruction: "Go to the Recycle Bin and Restore \"My Memories\".",
                knowledge_drop: "The Recycle Bin is a safety net. You can rescue deleted items unless you empty the bin.",
                pro_tip: None,
                action_prompt: Some("You've mastered the lifecycle of a folder!"),
                is_complete: |obs| obs.desktop_has("My Memories") && !obs.trash_has("My Memories"),
            },
        ],
        seed: Vec::new(),
    }
}

fn extensions() -> LevelConfig {
    LevelConfig {
        id: LevelId(2),
        title: "File Extensions & Types",
        description: "Identify different file types and organize them correctly.",
        steps: vec![
            LevelStep {
                instruction: "I have placed 5 messy files on your Desktop. Look at their names and icons.",
                knowledge_drop: "Extensions are the letters after the dot (like .jpg or .txt). They tell the computer which app opens the file.",
                pro_tip: None,
                action_prompt: Some("Ready to organize?"),
                is_complete: |_| true,
            },
            LevelStep {
                instruction: "Create a new folder on the Desktop named \"Media\".",
                knowledge_drop: "We need a place to store our pictures and music.",
                pro_tip: None,
                action_prompt: Some("Now let's fill it up."),
                is_complete: |obs| obs.desktop_has("Media"),
            },
            LevelStep {
                instruction: "Identify the picture file (vacation.jpg) and Move it into the \"Media\" folder.",
                knowledge_drop: ".jpg (JPEG) is a standard format for photographs.",
                pro_tip: Some("Right-click the file > Cut, then open Media folder > Paste. Or Drag and Drop if you feel lucky!"),
                action_prompt: Some("Excellent organization skills!"),
                is_complete: |obs| {
                    let in_media = obs
                        .store
                        .find_folder_by_name("Media")
                        .is_some_and(|media| obs.store.has_child_named(media.id, "vacation.jpg"));
                    in_media && !obs.desktop_has("vacation.jpg")
                },
            },
        ],
        seed: vec![
            Node::file(LEVEL_2_SEED_SENTINEL, DESKTOP_ID, "vacation.jpg", FileType::Image, "2.4 MB"),
            Node::file(NodeId(202), DESKTOP_ID, "notes.txt", FileType::Text, "12 KB"),
            Node::file(NodeId(203), DESKTOP_ID, "budget.xlsx", FileType::Spreadsheet, "45 KB"),
            Node::file(NodeId(204), DESKTOP_ID, "song.mp3", FileType::Audio, "4.1 MB"),
            Node::file(NodeId(205), DESKTOP_ID, "app.exe", FileType::App, "120 MB"),
        ],
    }
}

fn search() -> LevelConfig {
    LevelConfig {
        id: LevelId(3),
        title: "Search & Shortcuts",
        description: "Find lost files instantly using search tools.",
        steps: vec![
            LevelStep {
                instruction: "I have hidden a secret file somewhere in \"Documents\". Try to find \"secret_key.txt\" manually first by clicking folders.",
                knowledge_drop: "Browsing manually can take a long time if you have thousands of folders.",
                pro_tip: None,
                action_prompt: Some("That took a while (or maybe you couldn't find it). Let's try the fast way."),
                is_complete: |obs| obs.store.has_child_named(obs.current_folder, "secret_key.txt"),
            },
            LevelStep {
                instruction: "Use the Search Bar at the top right to find \"secret_key.txt\".",
                knowledge_drop: "Search looks through all folders and subfolders instantly.",
                pro_tip: Some("Ctrl + F usually highlights the search bar in most apps."),
                action_prompt: Some("Found it! Much faster, right?"),
                is_complete: |obs| {
                    obs.search_query.to_lowercase().contains("secret")
                        && obs
                            .search_results()
                            .iter()
                            .any(|node| node.name == "secret_key.txt")
                },
            },
        ],
        seed: vec![Node::file(
            LEVEL_3_SEED_SENTINEL,
            PROJECTS_ID,
            "secret_key.txt",
            FileType::Text,
            "1 KB",
        )],
    }
}

fn compression_and_security() -> LevelConfig {
    LevelConfig {
        id: LevelId(4),
        title: "Compression & Security",
        description: "Save space with ZIP and understand permissions.",
        steps: vec![
            LevelStep {
                instruction: "Select \"notes.txt\" and \"budget.xlsx\" and click \"Zip\" in the toolbar or menu.",
                knowledge_drop: "Zipping (Compressing) bundles files together and shrinks their size. Great for emailing multiple items.",
                pro_tip: None,
                action_prompt: Some("Now you have a neat package."),
                is_complete: |obs| {
                    obs.store
                        .children(DESKTOP_ID)
                        .iter()
                        .any(|node| node.name.to_lowercase().ends_with(".zip"))
                },
            },
            LevelStep {
                instruction: "Try to delete the file named \"System.sys\".",
                knowledge_drop: "Some files are critical for the computer to run. Windows protects them so you don't accidentally break things.",
                pro_tip: None,
                action_prompt: Some("Safety first!"),
                is_complete: |obs| {
                    obs.denied_delete
                        .and_then(|id| obs.store.get(id))
                        .is_some_and(|node| node.name_matches("System.sys"))
                },
            },
        ],
        seed: vec![Node::file(
            LEVEL_4_SEED_SENTINEL,
            DESKTOP_ID,
            "System.sys",
            FileType::System,
            "0 KB",
        )
        .system()],
    }
}

impl Observation<'_> {
    fn desktop_has(&self, name: &str) -> bool {
        self.store.has_child_named(DESKTOP_ID, name)
    }

    fn trash_has(&self, name: &str) -> bool {
        self.store.has_child_named(self.store.trash_id(), name)
    }
}
